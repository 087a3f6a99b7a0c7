//! Relay server listener
//!
//! Handles the TCP accept loop, spawns a handler task per connection, and
//! runs the camera reconciliation tick for the lifetime of the server. A
//! shutdown request flips the running flag, which unwinds the accept loop
//! and stops every extractor.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};

use crate::error::Result;
use crate::registry::CameraRegistry;
use crate::server::config::ServerConfig;
use crate::server::router::ClientConnection;

/// Clonable handle on the server's running flag
///
/// The shutdown route holds one of these; flipping it is what ends the
/// accept loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Create a handle in the running state
    pub fn new() -> Self {
        let (running, _) = watch::channel(true);
        Self {
            running: Arc::new(running),
        }
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.running.send(false);
    }

    /// Whether the server is still accepting connections
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.running.subscribe()
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// MJPEG relay server
pub struct RelayServer {
    config: ServerConfig,
    registry: Arc<CameraRegistry>,
    shutdown: ShutdownHandle,
    next_session_id: AtomicU64,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl RelayServer {
    /// Create a new server over the given camera registry
    pub fn new(config: ServerConfig, registry: CameraRegistry) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            registry: Arc::new(registry),
            shutdown: ShutdownHandle::new(),
            next_session_id: AtomicU64::new(1),
            connection_semaphore,
        }
    }

    /// Get a reference to the camera registry
    pub fn registry(&self) -> &Arc<CameraRegistry> {
        &self.registry
    }

    /// Get a shutdown handle for external control
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Bind the configured address and run the server
    ///
    /// This method blocks until a shutdown request is received.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Run the server on an already-bound listener
    ///
    /// Useful when binding with port 0 and reading the port back from the
    /// listener before starting.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        tracing::info!(
            addr = %listener.local_addr()?,
            cameras = self.registry.len(),
            "MJPEG relay server listening"
        );

        // Demand reconciliation runs for as long as the server does
        let reconcile_handle = self.registry.spawn_reconcile_task();
        let mut shutdown_rx = self.shutdown.subscribe();

        let result = tokio::select! {
            _ = shutdown_rx.changed() => {
                tracing::info!("Server shutting down");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        };

        reconcile_handle.abort();
        self.registry.stop_all();

        result
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            session_id = session_id,
            peer = %peer_addr,
            "New connection"
        );

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::debug!(session_id = session_id, error = %e, "Failed to set TCP_NODELAY");
            }
        }

        let config = self.config.clone();
        let registry = Arc::clone(&self.registry);
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let connection = ClientConnection::new(session_id, socket, config, registry, shutdown);

            if let Err(e) = connection.run().await {
                tracing::debug!(
                    session_id = session_id,
                    error = %e,
                    "Connection error"
                );
            }

            tracing::debug!(session_id = session_id, "Connection closed");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_handle_flips_running() {
        let handle = ShutdownHandle::new();
        assert!(handle.is_running());

        let observer = handle.clone();
        handle.shutdown();
        assert!(!observer.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_wakes_subscribers() {
        let handle = ShutdownHandle::new();
        let mut rx = handle.subscribe();

        let trigger = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.shutdown();
        });

        tokio::time::timeout(std::time::Duration::from_secs(1), rx.changed())
            .await
            .expect("shutdown signal never arrived")
            .unwrap();
        assert!(!*rx.borrow());
    }
}
