//! # DataStore Hub Bridge
//!
//! Translates data-sync engine hub notifications into ordered value maps that
//! can cross a plugin boundary:
//! - Outbox mutation processed / enqueued events → `{eventName, modelName, element}`
//! - Schema-driven element translation against a model registry
//! - Length-prefixed msgpack framing for byte-stream plugin channels
//! - A forwarder that drops untranslatable events without stopping
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!   hub events  →  │            HubForwarder              │  →  EventSink
//!   (mpsc)         │  ┌──────────────┐  ┌──────────────┐  │     (mpsc / frames)
//!                  │  │    Event     │→ │  HubElement  │  │
//!                  │  │  Translator  │  │  translate   │  │
//!                  │  └──────────────┘  └──────┬───────┘  │
//!                  │                    ┌──────┴───────┐  │
//!                  │                    │ModelRegistry │  │
//!                  │                    └──────────────┘  │
//!                  └──────────────────────────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod channel;
pub mod hub;
pub mod model;
pub mod types;
pub mod value;

// Internal utilities
pub mod observability;

pub use hub::{EventTranslator, HubForwarder, HubNotification, TranslatedEvent};
pub use model::ModelRegistry;
pub use types::{Config, ElementError, Error, ErrorKind, Result};
pub use value::{MapValue, ValueMap};
