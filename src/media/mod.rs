//! Media handling for the relay
//!
//! This module provides:
//! - JPEG frame boundary recovery from unframed camera byte streams

pub mod jpeg;

pub use jpeg::FrameAssembler;
