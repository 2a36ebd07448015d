//! Observability utilities.
//!
//! The bridge logs through `tracing`: the forwarder reports start/finish
//! counters at `info`, dropped hub events (with their element cause) at
//! `warn`, and per-event translation at `debug`/`trace`. Hosts embedding the
//! bridge call [`init_tracing`] with the `observability` section of
//! [`Config`](crate::Config), or install their own subscriber instead.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// `RUST_LOG` takes precedence over `config.log_level`. JSON output is chosen
/// by `config.json_logs` (`HUB_BRIDGE_LOG_FORMAT=json` via `Config::from_env`).
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let result = if config.json_logs {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
