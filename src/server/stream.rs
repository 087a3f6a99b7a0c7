//! Multipart frame streaming to one viewer
//!
//! Each viewer gets its own loop that forwards the camera's latest frame as
//! a multipart chunk whenever it changes. Viewers are independently paced:
//! a slow viewer skips frames rather than delaying anyone else, and a frame
//! is never observed half-written because publication replaces the whole
//! value.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::protocol::response;
use crate::registry::CameraEntry;

/// Stream frames to a viewer until it disconnects
///
/// The viewer is registered before the first frame is awaited, so the
/// reconciler activates the camera on its next tick. Departure is detected
/// either by a failed frame write or by EOF on the viewer's half of the
/// connection. The latter matters for a camera that never produces a
/// frame, where there would otherwise be nothing to write.
pub async fn stream_frames<S>(stream: S, entry: Arc<CameraEntry>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let _viewer = entry.add_viewer();
    let mut frames = entry.subscribe_frames();

    let (mut reader, mut writer) = tokio::io::split(stream);
    writer.write_all(response::stream_header()).await?;

    // A late joiner starts from the cached frame instead of waiting for the
    // camera to produce a new one
    let cached = frames.borrow_and_update().clone();
    if let Some(frame) = cached {
        if writer.write_all(&response::stream_part(&frame)).await.is_err() {
            return Ok(());
        }
    }

    let mut sink = [0u8; 256];
    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                if let Some(frame) = frame {
                    if writer.write_all(&response::stream_part(&frame)).await.is_err() {
                        break;
                    }
                }
            }
            read = reader.read(&mut sink) => {
                match read {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {} // stray bytes from the viewer are ignored
                }
            }
        }
    }

    tracing::debug!(camera = %entry.name(), "Viewer disconnected");
    Ok(())
}
