//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Element
//! translation failures keep their cause as the `source()` of the coarser
//! `Error::SchemaAcquisitionFailed`.

use thiserror::Error;

use crate::model::FieldType;
use crate::value::{MapValue, ValueMap};

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a hub element could not be translated against the model registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    /// The model name has no schema in the registry.
    #[error("model not found in registry: {0}")]
    ModelNotFound(String),

    /// The payload's model instance is not an object.
    #[error("model instance for {model_name} is not an object")]
    NotAnObject { model_name: String },

    /// The model instance carries no string `id`.
    #[error("model instance for {model_name} has no string id")]
    MissingId { model_name: String },

    /// A required field is absent or null.
    #[error("required field {model_name}.{field} is missing")]
    MissingField { model_name: String, field: String },

    /// A field value does not match its schema type.
    #[error("field {model_name}.{field} does not match schema type {expected:?}")]
    FieldTypeMismatch {
        model_name: String,
        field: String,
        expected: FieldType,
    },
}

/// Main error enum for the hub bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// Element translation failed; the event is not delivered.
    #[error("failed to acquire schema for hub event on model {model_name:?}")]
    SchemaAcquisitionFailed {
        model_name: String,
        #[source]
        source: ElementError,
    },

    /// An outbox event arrived without a mutation payload.
    #[error("invalid payload for hub event: {0}")]
    InvalidPayload(String),

    /// The receiving side of the event sink is gone.
    #[error("event sink closed")]
    SinkClosed,

    /// Delivery did not complete in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Encoded event exceeds the configured frame cap.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: u32 },

    /// Msgpack encoding errors.
    #[error("encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Msgpack decoding errors.
    #[error("decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse error category for callers that only branch on what failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SchemaAcquisitionFailed,
    InvalidPayload,
    SinkClosed,
    Timeout,
    Codec,
    Io,
    Config,
}

impl ErrorKind {
    /// Stable code sent across the plugin boundary.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::SchemaAcquisitionFailed => "SchemaAcquisitionFailed",
            ErrorKind::InvalidPayload => "InvalidPayload",
            ErrorKind::SinkClosed => "SinkClosed",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Codec => "Codec",
            ErrorKind::Io => "Io",
            ErrorKind::Config => "Config",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SchemaAcquisitionFailed { .. } => ErrorKind::SchemaAcquisitionFailed,
            Error::InvalidPayload(_) => ErrorKind::InvalidPayload,
            Error::SinkClosed => ErrorKind::SinkClosed,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::FrameTooLarge { .. } | Error::Encode(_) | Error::Decode(_) => ErrorKind::Codec,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Convert to the error map reported over the plugin channel.
    ///
    /// `cause` is present only when the error wraps an element failure.
    pub fn to_value_map(&self) -> ValueMap {
        let mut map = ValueMap::new();
        map.insert("errorCode".to_string(), self.kind().code().into());
        map.insert("message".to_string(), self.to_string().into());
        if let Error::SchemaAcquisitionFailed { source, .. } = self {
            map.insert("cause".to_string(), MapValue::String(source.to_string()));
        }
        map
    }
}

// Convenience constructors
impl Error {
    pub fn schema_acquisition(model_name: impl Into<String>, source: ElementError) -> Self {
        Self::SchemaAcquisitionFailed {
            model_name: model_name.into(),
            source,
        }
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_schema_acquisition_keeps_cause() {
        let err = Error::schema_acquisition(
            "UnknownModel",
            ElementError::ModelNotFound("UnknownModel".to_string()),
        );

        assert_eq!(err.kind(), ErrorKind::SchemaAcquisitionFailed);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("model not found in registry: UnknownModel")
        );
    }

    #[test]
    fn test_error_value_map() {
        let err = Error::schema_acquisition(
            "Post",
            ElementError::MissingField {
                model_name: "Post".to_string(),
                field: "title".to_string(),
            },
        );

        let map = err.to_value_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["errorCode", "message", "cause"]);
        assert_eq!(map["errorCode"], MapValue::from("SchemaAcquisitionFailed"));
        assert_eq!(
            map["cause"],
            MapValue::from("required field Post.title is missing")
        );
    }

    #[test]
    fn test_error_value_map_without_cause() {
        let map = Error::SinkClosed.to_value_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["errorCode"], MapValue::from("SinkClosed"));
        assert_eq!(map["message"], MapValue::from("event sink closed"));
    }

    #[test]
    fn test_codec_errors_share_kind() {
        let err = Error::FrameTooLarge { size: 10, max: 5 };
        assert_eq!(err.kind(), ErrorKind::Codec);
        assert_eq!(err.to_string(), "frame too large: 10 bytes (max 5)");
    }
}
