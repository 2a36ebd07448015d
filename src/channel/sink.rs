//! Event sinks — where translated maps leave the bridge.

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

use crate::channel::codec::{encode_value_map, write_frame, MSG_HUB_ERROR, MSG_HUB_EVENT};
use crate::types::{Error, ForwardingConfig, Result};
use crate::value::ValueMap;

/// Destination for translated hub events.
#[async_trait]
pub trait EventSink: Send {
    /// Deliver one event map.
    async fn deliver(&mut self, event: ValueMap) -> Result<()>;

    /// Report an event that was dropped. Sinks without an error lane ignore it.
    async fn report(&mut self, _error: ValueMap) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl EventSink for mpsc::Sender<ValueMap> {
    async fn deliver(&mut self, event: ValueMap) -> Result<()> {
        self.send(event).await.map_err(|_| Error::SinkClosed)
    }
}

/// Writes events as length-prefixed msgpack frames to a byte stream.
///
/// A write that is interrupted (cancelled or failed) part way through a frame
/// leaves the stream out of sync; the sink then refuses further writes with
/// `Error::SinkClosed`.
#[derive(Debug)]
pub struct FrameSink<W> {
    writer: W,
    max_frame_bytes: u32,
    dirty: bool,
}

impl<W> FrameSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W, max_frame_bytes: u32) -> Self {
        Self {
            writer,
            max_frame_bytes,
            dirty: false,
        }
    }

    pub fn from_config(writer: W, config: &ForwardingConfig) -> Self {
        Self::new(writer, config.max_frame_bytes)
    }

    /// Whether an earlier frame was left partially written.
    pub fn is_poisoned(&self) -> bool {
        self.dirty
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_map(&mut self, msg_type: u8, map: &ValueMap) -> Result<()> {
        if self.dirty {
            return Err(Error::SinkClosed);
        }
        let payload = encode_value_map(map)?;

        self.dirty = true;
        let result = write_frame(&mut self.writer, msg_type, &payload, self.max_frame_bytes).await;
        // Oversized frames are rejected before any byte is written
        if matches!(result, Ok(()) | Err(Error::FrameTooLarge { .. })) {
            self.dirty = false;
        }
        result
    }
}

#[async_trait]
impl<W> EventSink for FrameSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn deliver(&mut self, event: ValueMap) -> Result<()> {
        self.write_map(MSG_HUB_EVENT, &event).await
    }

    async fn report(&mut self, error: ValueMap) -> Result<()> {
        self.write_map(MSG_HUB_ERROR, &error).await
    }
}
