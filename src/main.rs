//! Relay server binary
//!
//! Run with: `mjpeg-relay [CONFIG_DIR]`
//!
//! The config directory (default `config`) must contain `cameras.json` and
//! `server.json`; see the `config` module for the file layout. Logging is
//! controlled through `RUST_LOG`.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use mjpeg_relay::registry::CameraRegistry;
use mjpeg_relay::server::RelayServer;
use mjpeg_relay::{config, RegistryConfig};

#[tokio::main]
async fn main() -> mjpeg_relay::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config"));

    let cameras = config::load_cameras(&config_dir.join("cameras.json"))?;
    let server_config = config::load_server(&config_dir.join("server.json"))?;

    tracing::info!(
        cameras = cameras.len(),
        config_dir = %config_dir.display(),
        "Configuration loaded"
    );

    let registry = CameraRegistry::new(cameras, RegistryConfig::default());
    let server = RelayServer::new(server_config, registry);
    server.run().await
}
