//! Configuration file loading
//!
//! Two JSON files configure the relay: `cameras.json` maps camera names to
//! their network endpoints and labels, and `server.json` carries the bind
//! address, description, admin token, and static page directory.
//!
//! ```json
//! // cameras.json
//! { "porch": { "ip": "192.168.2.20", "stream_port": 80,
//!              "location": "front door", "description": "entry cam" } }
//!
//! // server.json
//! { "ip": "0.0.0.0", "port": 8080, "description": "home cameras",
//!   "admin_token": "imadmin", "static_folder": "static" }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::registry::CameraInfo;
use crate::server::ServerConfig;

#[derive(Debug, Deserialize)]
struct CameraFileEntry {
    ip: String,
    stream_port: u16,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ServerFileEntry {
    ip: String,
    port: u16,
    #[serde(default)]
    description: String,
    #[serde(default = "default_admin_token")]
    admin_token: String,
    #[serde(default = "default_static_folder")]
    static_folder: PathBuf,
}

fn default_admin_token() -> String {
    "imadmin".into()
}

fn default_static_folder() -> PathBuf {
    PathBuf::from("static")
}

/// Load the camera definitions, ordered by name
pub fn load_cameras(path: &Path) -> Result<Vec<CameraInfo>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let entries: HashMap<String, CameraFileEntry> = serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let mut cameras: Vec<CameraInfo> = entries
        .into_iter()
        .map(|(name, entry)| CameraInfo {
            name,
            address: entry.ip,
            port: entry.stream_port,
            location: entry.location,
            description: entry.description,
        })
        .collect();
    cameras.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cameras)
}

/// Load the server configuration
pub fn load_server(path: &Path) -> Result<ServerConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let entry: ServerFileEntry = serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let bind_addr = format!("{}:{}", entry.ip, entry.port)
        .parse()
        .map_err(|e| Error::Config(format!("{}: invalid bind address: {}", path.display(), e)))?;

    Ok(ServerConfig::default()
        .bind(bind_addr)
        .description(entry.description)
        .admin_token(entry.admin_token)
        .static_dir(entry.static_folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mjpeg-relay-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_cameras() {
        let path = write_temp(
            "cameras.json",
            r#"{
                "porch": {"ip": "192.168.2.20", "stream_port": 80,
                          "location": "front door", "description": "entry cam"},
                "garage": {"ip": "192.168.2.21", "stream_port": 81}
            }"#,
        );

        let cameras = load_cameras(&path).unwrap();
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].name, "garage");
        assert_eq!(cameras[0].port, 81);
        assert_eq!(cameras[0].location, "");
        assert_eq!(cameras[1].name, "porch");
        assert_eq!(cameras[1].address, "192.168.2.20");
        assert_eq!(cameras[1].location, "front door");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_server_with_defaults() {
        let path = write_temp("server.json", r#"{"ip": "127.0.0.1", "port": 9090}"#);

        let config = load_server(&path).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.admin_token, "imadmin");
        assert_eq!(config.static_dir, PathBuf::from("static"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_server_full() {
        let path = write_temp(
            "server-full.json",
            r#"{"ip": "0.0.0.0", "port": 8081, "description": "garden cams",
                "admin_token": "letmein", "static_folder": "/srv/static"}"#,
        );

        let config = load_server(&path).unwrap();
        assert_eq!(config.description, "garden cams");
        assert_eq!(config.admin_token, "letmein");
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = load_cameras(Path::new("/nonexistent/cameras.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let path = write_temp("bad.json", "{not json");
        let result = load_cameras(&path);
        assert!(matches!(result, Err(Error::Config(_))));
        std::fs::remove_file(path).unwrap();
    }
}
