//! Frame codec for the plugin channel.
//!
//! Frame format:
//! ```text
//! ┌──────────┬──────────┬────────────────────────┐
//! │ len (4B) │ type(1B) │   msgpack payload      │
//! │ u32 BE   │ u8       │                        │
//! └──────────┴──────────┴────────────────────────┘
//! ```
//! Length = sizeof(type byte) + sizeof(payload), NOT including the 4-byte prefix.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::types::{Error, Result};
use crate::value::ValueMap;

/// Message type: translated hub event.
pub const MSG_HUB_EVENT: u8 = 0x01;
/// Message type: error map for a dropped hub event.
pub const MSG_HUB_ERROR: u8 = 0xFF;

/// Encode a value map to named msgpack.
pub fn encode_value_map(map: &ValueMap) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(map).map_err(|e| {
        tracing::error!("Msgpack encoding failed: {}", e);
        Error::from(e)
    })
}

/// Decode a msgpack payload back into a value map.
pub fn decode_value_map(payload: &[u8]) -> Result<ValueMap> {
    Ok(rmp_serde::from_slice(payload)?)
}

/// Read one frame from the stream.
///
/// Returns `(msg_type, payload_bytes)`. Returns `None` on clean EOF, i.e. the
/// stream ends on a frame boundary.
/// `max_frame_bytes` caps the maximum accepted payload size.
pub async fn read_frame<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    max_frame_bytes: u32,
) -> std::io::Result<Option<(u8, Vec<u8>)>> {
    // Read 4-byte length prefix; EOF is clean only before its first byte
    let mut len_buf = [0u8; 4];
    if reader.read(&mut len_buf[..1]).await? == 0 {
        return Ok(None);
    }
    reader.read_exact(&mut len_buf[1..]).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Stream ended inside frame length prefix",
            )
        } else {
            e
        }
    })?;

    let frame_len = u32::from_be_bytes(len_buf);
    if frame_len > max_frame_bytes {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Frame too large: {} bytes", frame_len),
        ));
    }
    if frame_len < 1 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Frame too short: missing type byte",
        ));
    }

    let mut frame_data = vec![0u8; frame_len as usize];
    reader.read_exact(&mut frame_data).await?;

    let msg_type = frame_data[0];
    let payload = frame_data[1..].to_vec();

    Ok(Some((msg_type, payload)))
}

/// Write one frame to the stream, refusing payloads above `max_frame_bytes`.
pub async fn write_frame<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg_type: u8,
    payload: &[u8],
    max_frame_bytes: u32,
) -> Result<()> {
    let frame_len = u32::try_from(payload.len() + 1)
        .ok()
        .filter(|len| *len <= max_frame_bytes)
        .ok_or(Error::FrameTooLarge {
            size: payload.len() + 1,
            max: max_frame_bytes,
        })?;

    writer.write_all(&frame_len.to_be_bytes()).await?;
    writer.write_all(&[msg_type]).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}
