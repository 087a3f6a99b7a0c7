//! Crate-level error types
//!
//! Errors are split by where they surface: upstream camera I/O, inbound
//! request handling, and configuration loading.

use std::io;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relay operations
#[derive(Debug)]
pub enum Error {
    /// Underlying socket or file I/O failure
    Io(io::Error),
    /// Camera could not be reached within the connect timeout
    CameraUnreachable {
        /// Configured camera name
        camera: String,
        /// What the connect attempt reported
        reason: String,
    },
    /// Camera was reached but never produced a complete frame in time
    IncompleteFrame {
        /// Configured camera name
        camera: String,
    },
    /// Inbound request could not be parsed as an HTTP request line
    MalformedRequest(String),
    /// Configuration file could not be read or parsed
    Config(String),
    /// JSON encoding or decoding failure
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::CameraUnreachable { camera, reason } => {
                write!(f, "Camera '{}' unreachable: {}", camera, reason)
            }
            Error::IncompleteFrame { camera } => {
                write!(f, "Camera '{}' produced no complete frame in time", camera)
            }
            Error::MalformedRequest(line) => write!(f, "Malformed request: {}", line),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
