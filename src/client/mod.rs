//! Upstream camera client
//!
//! Connects to cameras over plain TCP, requests the stream or capture
//! resource with a fixed request line, and recovers JPEG frames from the
//! unframed response bytes.

pub mod camera;

pub use camera::capture_once;
pub(crate) use camera::spawn_extractor;
