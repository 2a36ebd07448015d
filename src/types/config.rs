//! Configuration structures.
//!
//! Configuration is deserialized with serde defaults and can be overlaid from
//! `HUB_BRIDGE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{Error, Result};

/// Global bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Event forwarding configuration.
    #[serde(default)]
    pub forwarding: ForwardingConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Event forwarding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Bounded channel capacity between the hub and the forwarder.
    pub channel_capacity: usize,

    /// Maximum encoded event size in bytes.
    pub max_frame_bytes: u32,

    /// How long a single delivery may wait on a slow listener.
    #[serde(with = "humantime_serde")]
    pub send_timeout: Duration,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            max_frame_bytes: 5 * 1024 * 1024,
            send_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Defaults overlaid with `HUB_BRIDGE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`, keyed by env var name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup("HUB_BRIDGE_LOG_LEVEL") {
            config.observability.log_level = level;
        }
        if let Some(format) = lookup("HUB_BRIDGE_LOG_FORMAT") {
            config.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        if let Some(capacity) = lookup("HUB_BRIDGE_CHANNEL_CAPACITY") {
            let capacity: usize = capacity
                .parse()
                .map_err(|_| Error::config(format!("invalid channel capacity: {}", capacity)))?;
            if capacity == 0 {
                return Err(Error::config("channel capacity must be positive"));
            }
            config.forwarding.channel_capacity = capacity;
        }
        if let Some(max) = lookup("HUB_BRIDGE_MAX_FRAME_BYTES") {
            config.forwarding.max_frame_bytes = max
                .parse()
                .map_err(|_| Error::config(format!("invalid max frame bytes: {}", max)))?;
        }
        if let Some(timeout) = lookup("HUB_BRIDGE_SEND_TIMEOUT") {
            config.forwarding.send_timeout = humantime_serde::re::humantime::parse_duration(
                &timeout,
            )
            .map_err(|e| Error::config(format!("invalid send timeout {:?}: {}", timeout, e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.forwarding.channel_capacity, 64);
        assert_eq!(config.forwarding.send_timeout, Duration::from_secs(5));
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_env_overlay() {
        let config = Config::from_lookup(lookup_from(&[
            ("HUB_BRIDGE_LOG_LEVEL", "debug"),
            ("HUB_BRIDGE_LOG_FORMAT", "JSON"),
            ("HUB_BRIDGE_CHANNEL_CAPACITY", "8"),
            ("HUB_BRIDGE_SEND_TIMEOUT", "250ms"),
        ]))
        .unwrap();

        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.json_logs);
        assert_eq!(config.forwarding.channel_capacity, 8);
        assert_eq!(config.forwarding.send_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup_from(&[("HUB_BRIDGE_CHANNEL_CAPACITY", "0")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("HUB_BRIDGE_SEND_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "forwarding": { "send_timeout": "2s" }
        }))
        .unwrap();

        assert_eq!(config.forwarding.send_timeout, Duration::from_secs(2));
        assert_eq!(config.forwarding.max_frame_bytes, 5 * 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }
}
