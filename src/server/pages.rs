//! Status, error, and JSON status responders
//!
//! Page bodies come from the configured static directory when present;
//! built-in fallbacks keep the server usable without any static files.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::protocol::response;
use crate::registry::{CameraRegistry, CameraStats};
use crate::server::config::ServerConfig;
use crate::server::listener::ShutdownHandle;

const FALLBACK_ERROR_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>Not found</title></head>\n<body><h1>404</h1><p>The requested page or camera does not exist.</p></body>\n</html>\n";

/// Server status snapshot rendered on the JSON route
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    description: &'a str,
    running: bool,
    viewers: u32,
    cameras: Vec<CameraStats>,
}

/// Send the HTML status page
pub async fn send_status_page<S>(
    stream: &mut S,
    config: &ServerConfig,
    registry: &CameraRegistry,
) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let body = match tokio::fs::read(config.static_dir.join("status.html")).await {
        Ok(bytes) => bytes,
        Err(_) => render_fallback_status(config, registry).into_bytes(),
    };
    stream.write_all(&response::html_page(&body)).await?;
    Ok(())
}

/// Send the HTML error page
///
/// Like the rest of the relay's error path this answers `200 OK` with an
/// error body; clients watching for it key off the page content.
pub async fn send_error_page<S>(stream: &mut S, config: &ServerConfig) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let body = match tokio::fs::read(config.static_dir.join("404.html")).await {
        Ok(bytes) => bytes,
        Err(_) => FALLBACK_ERROR_PAGE.as_bytes().to_vec(),
    };
    stream.write_all(&response::html_page(&body)).await?;
    Ok(())
}

/// Send the JSON status snapshot
pub async fn send_status_json<S>(
    stream: &mut S,
    config: &ServerConfig,
    registry: &CameraRegistry,
    shutdown: &ShutdownHandle,
) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let report = StatusReport {
        description: &config.description,
        running: shutdown.is_running(),
        viewers: registry.total_viewers(),
        cameras: registry.stats().cameras,
    };
    let body = serde_json::to_vec(&report)?;
    stream.write_all(&response::json_body(&body)).await?;
    Ok(())
}

/// Minimal status page used when no static file is configured
fn render_fallback_status(config: &ServerConfig, registry: &CameraRegistry) -> String {
    let cameras = registry.stats().cameras;

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head><title>Camera relay status</title></head>\n<body>\n");
    page.push_str(&format!("<h1>{}</h1>\n<ul>\n", config.description));
    for camera in cameras {
        page.push_str(&format!(
            "<li>{} &mdash; {} ({}, {} viewer(s))</li>\n",
            camera.name,
            camera.location,
            if camera.active { "active" } else { "idle" },
            camera.viewers,
        ));
    }
    page.push_str("</ul>\n</body>\n</html>\n");
    page
}
