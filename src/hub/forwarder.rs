//! Hub forwarder — translate notifications and hand them to a sink.
//!
//! A translation failure aborts delivery of that one notification only: it is
//! logged, reported to the sink's error lane and counted as dropped. Sink
//! failures end the run.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::channel::EventSink;
use crate::hub::{EventTranslator, HubNotification};
use crate::types::{Error, ErrorKind, ForwardingConfig, Result};

/// Outcome of forwarding a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Translated and delivered to the sink.
    Forwarded,
    /// Not an event this bridge forwards.
    Filtered,
}

/// Counters for one forwarder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ForwardStats {
    pub received: u64,
    pub forwarded: u64,
    pub filtered: u64,
    pub dropped: u64,
}

/// Forwards translated hub events to an [`EventSink`].
#[derive(Debug)]
pub struct HubForwarder<S> {
    translator: EventTranslator,
    sink: S,
    send_timeout: Duration,
    stats: ForwardStats,
}

impl<S: EventSink> HubForwarder<S> {
    pub fn new(translator: EventTranslator, sink: S, config: &ForwardingConfig) -> Self {
        Self {
            translator,
            sink,
            send_timeout: config.send_timeout,
            stats: ForwardStats::default(),
        }
    }

    pub fn stats(&self) -> ForwardStats {
        self.stats
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Translate and deliver one notification.
    ///
    /// Translation errors are returned to the caller after being counted;
    /// nothing is delivered for that notification. A delivery that hits
    /// `send_timeout` is abandoned mid-write; a [`FrameSink`] then rejects
    /// every later event with `Error::SinkClosed`.
    ///
    /// [`FrameSink`]: crate::channel::FrameSink
    pub async fn forward(&mut self, notification: &HubNotification) -> Result<Delivery> {
        self.stats.received += 1;

        let event = match self.translator.translate(notification) {
            Ok(Some(event)) => event,
            Ok(None) => {
                self.stats.filtered += 1;
                return Ok(Delivery::Filtered);
            }
            Err(err) => {
                self.stats.dropped += 1;
                return Err(err);
            }
        };

        timeout(self.send_timeout, self.sink.deliver(event))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "delivery of {} exceeded {:?}",
                    notification.event_name, self.send_timeout
                ))
            })??;

        self.stats.forwarded += 1;
        Ok(Delivery::Forwarded)
    }

    /// Forward notifications until `rx` closes.
    ///
    /// Returns the final counters, or the sink error that stopped the run.
    pub async fn run(mut self, mut rx: mpsc::Receiver<HubNotification>) -> Result<ForwardStats> {
        tracing::info!("Hub forwarder started");

        while let Some(notification) = rx.recv().await {
            match self.forward(&notification).await {
                Ok(_) => {}
                Err(err) if is_per_event(&err) => {
                    let cause = std::error::Error::source(&err)
                        .map(|source| source.to_string())
                        .unwrap_or_default();
                    tracing::warn!(
                        "Dropping hub event {}: {} {}",
                        notification.event_name,
                        err,
                        cause,
                    );
                    self.report(&err).await?;
                }
                Err(err) => {
                    tracing::error!("Hub forwarder stopped: {}", err);
                    return Err(err);
                }
            }
        }

        tracing::info!(
            "Hub forwarder finished (received={}, forwarded={}, filtered={}, dropped={})",
            self.stats.received,
            self.stats.forwarded,
            self.stats.filtered,
            self.stats.dropped,
        );
        Ok(self.stats)
    }

    async fn report(&mut self, err: &Error) -> Result<()> {
        timeout(self.send_timeout, self.sink.report(err.to_value_map()))
            .await
            .map_err(|_| Error::timeout("error report exceeded send timeout"))?
    }
}

/// Errors that abort a single event rather than the forwarder.
fn is_per_event(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::SchemaAcquisitionFailed | ErrorKind::InvalidPayload
    )
}
