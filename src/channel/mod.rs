//! Plugin channel output — frame codec and event sinks.
//!
//! Translated maps are handed to an [`EventSink`]: either an in-process
//! mpsc channel or a byte stream carrying length-prefixed msgpack frames.

pub mod codec;
pub mod sink;

pub use sink::{EventSink, FrameSink};
