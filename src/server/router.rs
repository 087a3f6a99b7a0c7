//! Per-connection request routing
//!
//! One `ClientConnection` is created per inbound connection. It reads the
//! request head, parses the request line, and dispatches to the matching
//! handler. Camera selection uses the `cam=<name>` query parameter with
//! exact, case-sensitive matching against configured names.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::protocol::request::{read_request_line, Request};
use crate::protocol::response;
use crate::registry::CameraRegistry;
use crate::server::config::ServerConfig;
use crate::server::listener::ShutdownHandle;
use crate::server::{capture, pages, stream};

/// Handler for a single inbound connection
pub struct ClientConnection<S> {
    session_id: u64,
    stream: S,
    config: ServerConfig,
    registry: Arc<CameraRegistry>,
    shutdown: ShutdownHandle,
}

impl<S> ClientConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a connection handler
    pub fn new(
        session_id: u64,
        stream: S,
        config: ServerConfig,
        registry: Arc<CameraRegistry>,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            session_id,
            stream,
            config,
            registry,
            shutdown,
        }
    }

    /// Read, parse, and dispatch the request, then finish the connection
    pub async fn run(mut self) -> Result<()> {
        let line = read_request_line(&mut self.stream).await?;
        let request = match Request::parse(&line) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(session_id = self.session_id, error = %e, "Unparseable request");
                return pages::send_error_page(&mut self.stream, &self.config).await;
            }
        };

        tracing::debug!(
            session_id = self.session_id,
            path = %request.path,
            camera = request.camera().unwrap_or("-"),
            "Request"
        );

        match request.path.as_str() {
            "/status" => pages::send_status_page(&mut self.stream, &self.config, &self.registry).await,
            path if path.strip_prefix("/shutdown/") == Some(self.config.admin_token.as_str()) => {
                // Best-effort acknowledgement; the shutdown proceeds either way
                let _ = self.stream.write_all(response::no_content()).await;
                tracing::info!(session_id = self.session_id, "Shutdown command received");
                self.shutdown.shutdown();
                Ok(())
            }
            "/stream" => match self.lookup_camera(&request) {
                Some(entry) => stream::stream_frames(self.stream, entry).await,
                None => pages::send_error_page(&mut self.stream, &self.config).await,
            },
            "/capture" => match self.lookup_camera(&request) {
                Some(entry) => {
                    capture::send_capture(
                        &mut self.stream,
                        &entry,
                        &self.config,
                        self.registry.config(),
                    )
                    .await
                }
                None => pages::send_error_page(&mut self.stream, &self.config).await,
            },
            "/api/status" => {
                pages::send_status_json(
                    &mut self.stream,
                    &self.config,
                    &self.registry,
                    &self.shutdown,
                )
                .await
            }
            _ => pages::send_error_page(&mut self.stream, &self.config).await,
        }
    }

    fn lookup_camera(&self, request: &Request) -> Option<Arc<crate::registry::CameraEntry>> {
        match request.camera() {
            Some(name) => {
                let entry = self.registry.get(name);
                if entry.is_none() {
                    tracing::debug!(
                        session_id = self.session_id,
                        camera = name,
                        "Unknown camera requested"
                    );
                }
                entry
            }
            None => {
                tracing::debug!(session_id = self.session_id, "No camera specified");
                None
            }
        }
    }
}
