//! Camera registry and demand-driven lifecycle
//!
//! The registry owns one entry per configured camera and aligns each
//! camera's upstream connection with current viewer demand on a periodic
//! reconciliation tick.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<CameraRegistry>
//!                   ┌──────────────────────────┐
//!                   │ cameras: HashMap<Name,   │
//!                   │   CameraEntry {          │
//!                   │     frame_tx: watch::Tx, │
//!                   │     viewer_count,        │
//!                   │     extractor,           │
//!                   │   }                      │
//!                   │ >                        │
//!                   └────────────┬─────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        │                       │                       │
//!        ▼                       ▼                       ▼
//!   [Extractor]             [Viewer]                [Viewer]
//!   publish_frame()         frames.changed()        frames.changed()
//!        │                       │                       │
//!        └──► watch channel ──► stream_part() ──► TCP ──┘
//! ```
//!
//! # Zero-Copy Design
//!
//! `bytes::Bytes` uses reference counting, so every viewer of a camera
//! shares the same frame allocation. Publishing replaces the watch channel's
//! value wholesale, which is what guarantees a reader only ever observes a
//! complete frame.

pub mod config;
pub mod entry;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{CameraEntry, CameraInfo, CameraStats, ViewerGuard};
pub use store::{CameraRegistry, RegistryStats};
