//! Core types for the hub bridge.
//!
//! - **Errors**: element translation causes and the crate error, with thiserror derives
//! - **Config**: observability and forwarding configuration

mod config;
mod errors;

pub use config::{Config, ForwardingConfig, ObservabilityConfig};
pub use errors::{ElementError, Error, ErrorKind, Result};
