//! Viewer-facing HTTP wire protocol
//!
//! This module provides:
//! - Request-line parsing into a structured `{path, query}` value
//! - Response formatting for HTML pages, JSON payloads, single JPEG images,
//!   and the boundary-delimited multipart frame stream

pub mod request;
pub mod response;

pub use request::Request;
