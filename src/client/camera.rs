//! Camera connection handling
//!
//! Two upstream operations exist: a long-lived stream pull that feeds a
//! camera entry until told to stop, and a one-shot capture fetch used when
//! no frame is cached. Both treat the camera as a dumb byte source; frame
//! boundaries come entirely from the JPEG markers.

use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::media::FrameAssembler;
use crate::registry::entry::ExtractorHandle;
use crate::registry::{CameraEntry, CameraInfo, RegistryConfig};

/// Request line sent to a camera's stream resource
const STREAM_REQUEST: &[u8] = b"GET /stream HTTP/1.1\r\n\r\n";

/// Request line sent to a camera's capture resource
const CAPTURE_REQUEST: &[u8] = b"GET /capture HTTP/1.1\r\n\r\n";

/// Spawn a frame extractor task for the given camera
///
/// The task runs until the stop signal fires or the connection fails. It
/// never restarts itself; that decision belongs to the reconciler.
pub(crate) fn spawn_extractor(entry: Arc<CameraEntry>, config: RegistryConfig) -> ExtractorHandle {
    let (stop_tx, stop_rx) = watch::channel(false);
    let task = tokio::spawn(extract_frames(entry, config, stop_rx));
    ExtractorHandle { stop_tx, task }
}

async fn extract_frames(
    entry: Arc<CameraEntry>,
    config: RegistryConfig,
    stop_rx: watch::Receiver<bool>,
) {
    let name = entry.name().to_string();
    tracing::info!(camera = %name, address = %entry.info().address, port = entry.info().port, "Connecting to camera");

    let stream = match connect(entry.info(), config.connect_timeout).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(camera = %name, error = %e, "Camera unreachable");
            return;
        }
    };

    match pull_frames(&entry, &config, stream, stop_rx).await {
        Ok(()) => tracing::info!(camera = %name, "Camera connection closed"),
        Err(e) => tracing::warn!(camera = %name, error = %e, "Camera stream failed"),
    }
}

/// Read the camera's byte stream and publish every completed frame
async fn pull_frames(
    entry: &CameraEntry,
    config: &RegistryConfig,
    mut stream: TcpStream,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<()> {
    stream.write_all(STREAM_REQUEST).await?;

    let mut assembler = FrameAssembler::new(config.max_frame_buffer);
    let mut chunk = BytesMut::with_capacity(4096);

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            read = stream.read_buf(&mut chunk) => {
                if read? == 0 {
                    // Camera closed the connection; the reconciler decides
                    // whether demand warrants a fresh attempt
                    break;
                }
                for frame in assembler.push(&chunk) {
                    entry.publish_frame(frame);
                }
                chunk.clear();
            }
        }
    }
    Ok(())
}

/// Fetch a single frame from the camera, bounded by the capture deadline
///
/// Used by the capture path when no frame is cached; the whole
/// connect-request-read sequence must finish within `capture_timeout`.
pub async fn capture_once(info: &CameraInfo, config: &RegistryConfig) -> Result<Bytes> {
    let deadline = tokio::time::Instant::now() + config.capture_timeout;

    let mut stream = connect(info, config.capture_timeout).await?;
    stream.write_all(CAPTURE_REQUEST).await?;

    let mut assembler = FrameAssembler::new(config.max_frame_buffer);
    let mut chunk = BytesMut::with_capacity(4096);

    loop {
        let remaining = deadline
            .checked_duration_since(tokio::time::Instant::now())
            .ok_or_else(|| Error::IncompleteFrame {
                camera: info.name.clone(),
            })?;

        let read = tokio::time::timeout(remaining, stream.read_buf(&mut chunk))
            .await
            .map_err(|_| Error::IncompleteFrame {
                camera: info.name.clone(),
            })?;

        if read? == 0 {
            return Err(Error::IncompleteFrame {
                camera: info.name.clone(),
            });
        }

        if let Some(frame) = assembler.push(&chunk).into_iter().next() {
            return Ok(frame);
        }
        chunk.clear();
    }
}

/// Open the upstream TCP connection within the given timeout
async fn connect(info: &CameraInfo, timeout: Duration) -> Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect(info.endpoint())).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(Error::CameraUnreachable {
            camera: info.name.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Err(Error::CameraUnreachable {
            camera: info.name.clone(),
            reason: format!("connect timed out after {:?}", timeout),
        }),
    }
}
