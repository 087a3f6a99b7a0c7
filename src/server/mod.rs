//! Viewer-facing HTTP server
//!
//! Accept loop, per-connection request routing, and the handlers behind
//! each route: the multipart frame stream, single-image capture, status
//! pages, and remote shutdown.

pub mod capture;
pub mod config;
pub mod listener;
pub mod pages;
pub mod router;
pub mod stream;

pub use config::ServerConfig;
pub use listener::{RelayServer, ShutdownHandle};
pub use router::ClientConnection;
