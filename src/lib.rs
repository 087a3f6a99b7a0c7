//! Demand-driven MJPEG relay server
//!
//! Relays live JPEG frame streams from a small number of constrained
//! network cameras (ESP32-CAM class devices) to any number of HTTP viewers,
//! without re-encoding. Cameras are only connected while someone is
//! watching: viewer demand drives the upstream connection lifecycle.
//!
//! # Architecture
//!
//! ```text
//! Camera ──TCP──► Frame extractor ──► CameraEntry.latest_frame
//!                                          │
//!                          ┌───────────────┼───────────────┐
//!                          ▼               ▼               ▼
//!                      [Viewer]          [Viewer]         [Capture]
//!                   multipart stream  multipart stream   single JPEG
//! ```
//!
//! Viewer arrival and departure feed the per-camera viewer count; a
//! periodic reconciliation pass starts an extractor for each camera with
//! demand and stops it once the last viewer leaves.
//!
//! # Example
//!
//! ```no_run
//! use mjpeg_relay::registry::{CameraInfo, CameraRegistry, RegistryConfig};
//! use mjpeg_relay::server::{RelayServer, ServerConfig};
//!
//! # async fn example() -> mjpeg_relay::Result<()> {
//! let cameras = vec![CameraInfo {
//!     name: "porch".into(),
//!     address: "192.168.2.20".into(),
//!     port: 80,
//!     location: "front door".into(),
//!     description: "entry cam".into(),
//! }];
//!
//! let registry = CameraRegistry::new(cameras, RegistryConfig::default());
//! let server = RelayServer::new(ServerConfig::default(), registry);
//! server.run().await
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod media;
pub mod protocol;
pub mod registry;
pub mod server;

pub use error::{Error, Result};
pub use registry::{CameraInfo, CameraRegistry, RegistryConfig};
pub use server::{RelayServer, ServerConfig, ShutdownHandle};
