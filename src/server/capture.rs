//! Single-image capture responder
//!
//! Serves exactly one frame, then the connection closes. A cached frame is
//! reused without touching the camera; only a cold cache triggers a bounded
//! one-shot fetch upstream.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client;
use crate::error::Result;
use crate::protocol::response;
use crate::registry::{CameraEntry, RegistryConfig};
use crate::server::config::ServerConfig;
use crate::server::pages;

/// Respond with the camera's current frame, fetching one if none is cached
pub async fn send_capture<S>(
    stream: &mut S,
    entry: &CameraEntry,
    server_config: &ServerConfig,
    registry_config: &RegistryConfig,
) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let frame = match entry.latest_frame() {
        Some(frame) => Some(frame),
        None => match client::capture_once(entry.info(), registry_config).await {
            Ok(frame) => {
                // Cache it so the next capture skips the camera entirely
                entry.publish_frame(frame.clone());
                Some(frame)
            }
            Err(e) => {
                tracing::warn!(camera = %entry.name(), error = %e, "Capture failed");
                None
            }
        },
    };

    match frame {
        Some(frame) => stream.write_all(&response::jpeg_image(&frame)).await?,
        None => pages::send_error_page(stream, server_config).await?,
    }
    Ok(())
}
