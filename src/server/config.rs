//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Free-text server description, reported on the status routes
    pub description: String,

    /// Path segment authorizing the shutdown route
    pub admin_token: String,

    /// Directory holding the static status and error pages
    pub static_dir: PathBuf,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            description: "MJPEG relay server".into(),
            admin_token: "imadmin".into(),
            static_dir: PathBuf::from("static"),
            max_connections: 0, // Unlimited
            tcp_nodelay: true,  // Important for low latency
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the server description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the shutdown admin token
    pub fn admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = token.into();
        self
    }

    /// Set the static page directory
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 0);
        assert_eq!(config.admin_token, "imadmin");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_builder_admin_token() {
        let config = ServerConfig::default().admin_token("secret");

        assert_eq!(config.admin_token, "secret");
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .description("garden cams")
            .admin_token("letmein")
            .static_dir("/srv/relay/static")
            .max_connections(50);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.description, "garden cams");
        assert_eq!(config.admin_token, "letmein");
        assert_eq!(config.static_dir, PathBuf::from("/srv/relay/static"));
        assert_eq!(config.max_connections, 50);
    }
}
