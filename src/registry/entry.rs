//! Per-camera state
//!
//! A `CameraEntry` holds the latest frame, the viewer count, and the running
//! frame extractor (if any) for one configured camera. Entries are created
//! at startup and live for the process lifetime.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::config::RegistryConfig;

/// Immutable identity of a configured camera
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Unique camera name, the `cam=` routing key
    pub name: String,
    /// Network address (hostname or IP)
    pub address: String,
    /// TCP port of the camera's stream server
    pub port: u16,
    /// Free-text location label
    pub location: String,
    /// Free-text description
    pub description: String,
}

impl CameraInfo {
    /// Address/port pair suitable for `TcpStream::connect`
    pub fn endpoint(&self) -> (&str, u16) {
        (self.address.as_str(), self.port)
    }
}

/// Handle on a running frame extractor task
pub(crate) struct ExtractorHandle {
    pub(crate) stop_tx: watch::Sender<bool>,
    pub(crate) task: JoinHandle<()>,
}

impl ExtractorHandle {
    /// Ask the extractor to wind down; it reacts at its next suspension point
    pub(crate) fn signal_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// State for a single camera in the registry
pub struct CameraEntry {
    info: CameraInfo,

    /// Latest complete frame, `None` until the first frame arrives.
    /// Replaced wholesale on publish; viewers subscribe for change
    /// notifications and the capture path reads the current value directly.
    frame_tx: watch::Sender<Option<Bytes>>,

    /// Number of live stream viewers
    viewer_count: AtomicU32,

    /// Running extractor, if the camera is active
    extractor: Mutex<Option<ExtractorHandle>>,
}

impl CameraEntry {
    /// Create an idle entry with no cached frame
    pub fn new(info: CameraInfo) -> Self {
        let (frame_tx, _) = watch::channel(None);
        Self {
            info,
            frame_tx,
            viewer_count: AtomicU32::new(0),
            extractor: Mutex::new(None),
        }
    }

    /// Camera identity
    pub fn info(&self) -> &CameraInfo {
        &self.info
    }

    /// Configured camera name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The most recently completed frame, if any
    pub fn latest_frame(&self) -> Option<Bytes> {
        self.frame_tx.borrow().clone()
    }

    /// Replace the latest frame and notify subscribed viewers
    pub fn publish_frame(&self, frame: Bytes) {
        tracing::trace!(camera = %self.info.name, bytes = frame.len(), "Frame published");
        self.frame_tx.send_replace(Some(frame));
    }

    /// Subscribe to frame updates; the current value counts as already seen
    pub fn subscribe_frames(&self) -> watch::Receiver<Option<Bytes>> {
        self.frame_tx.subscribe()
    }

    /// Number of connected stream viewers
    pub fn viewer_count(&self) -> u32 {
        self.viewer_count.load(Ordering::Relaxed)
    }

    /// Register a viewer; the returned guard deregisters it on drop
    ///
    /// Registration is visible to the reconciler immediately, so the camera
    /// starts within one tick of the first viewer arriving.
    pub fn add_viewer(self: &Arc<Self>) -> ViewerGuard {
        let viewers = self.viewer_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(camera = %self.info.name, viewers, "Viewer added");
        ViewerGuard {
            entry: Arc::clone(self),
        }
    }

    /// Whether an extractor is currently running for this camera
    pub fn is_active(&self) -> bool {
        self.extractor
            .lock().unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Align extractor state with current demand; called from the registry tick
    ///
    /// Idempotent: a camera that is already active is left alone, and a
    /// finished extractor (camera unreachable, upstream closed) is cleared so
    /// persisting demand retriggers a fresh attempt on a later tick.
    pub(crate) fn reconcile(self: &Arc<Self>, config: &RegistryConfig) {
        let viewers = self.viewer_count();
        let mut slot = self.extractor.lock().unwrap();

        if slot.as_ref().is_some_and(|handle| handle.is_finished()) {
            *slot = None;
            tracing::debug!(camera = %self.info.name, "Extractor task exited");
        }

        if viewers > 0 && slot.is_none() {
            tracing::info!(camera = %self.info.name, viewers, "Starting frame extractor");
            *slot = Some(crate::client::spawn_extractor(
                Arc::clone(self),
                config.clone(),
            ));
        } else if viewers == 0 && slot.is_some() {
            tracing::info!(camera = %self.info.name, "Stopping frame extractor, no viewers");
            if let Some(handle) = slot.take() {
                handle.signal_stop();
            }
        }
    }

    /// Signal the extractor to stop without waiting for it
    pub(crate) fn stop_extractor(&self) {
        let mut slot = self.extractor.lock().unwrap();
        if let Some(handle) = slot.take() {
            handle.signal_stop();
        }
    }

    /// Snapshot for status reporting
    pub fn stats(&self) -> CameraStats {
        CameraStats {
            name: self.info.name.clone(),
            location: self.info.location.clone(),
            description: self.info.description.clone(),
            active: self.is_active(),
            viewers: self.viewer_count(),
            has_frame: self.frame_tx.borrow().is_some(),
        }
    }
}

/// RAII registration of one stream viewer
///
/// Dropping the guard is how viewer departure reaches the reconciler: the
/// count decrements as soon as the viewer task unwinds, and the next tick
/// observes it.
pub struct ViewerGuard {
    entry: Arc<CameraEntry>,
}

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        let prev = self.entry.viewer_count.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(
            camera = %self.entry.info.name,
            viewers = prev.saturating_sub(1),
            "Viewer removed"
        );
    }
}

/// Point-in-time statistics for one camera
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraStats {
    /// Configured camera name
    pub name: String,
    /// Location label
    pub location: String,
    /// Description label
    pub description: String,
    /// Whether an upstream connection is running
    pub active: bool,
    /// Connected stream viewers
    pub viewers: u32,
    /// Whether a frame is cached for capture reuse
    pub has_frame: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Arc<CameraEntry> {
        Arc::new(CameraEntry::new(CameraInfo {
            name: "cam1".into(),
            address: "127.0.0.1".into(),
            port: 1,
            location: "hallway".into(),
            description: "test camera".into(),
        }))
    }

    #[test]
    fn test_viewer_guard_counts() {
        let entry = entry();
        assert_eq!(entry.viewer_count(), 0);

        let first = entry.add_viewer();
        let second = entry.add_viewer();
        assert_eq!(entry.viewer_count(), 2);

        drop(first);
        assert_eq!(entry.viewer_count(), 1);
        drop(second);
        assert_eq!(entry.viewer_count(), 0);
    }

    #[test]
    fn test_latest_frame_starts_empty() {
        let entry = entry();
        assert!(entry.latest_frame().is_none());

        entry.publish_frame(Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xD9]));
        assert_eq!(
            entry.latest_frame().unwrap(),
            Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xD9])
        );
    }

    #[tokio::test]
    async fn test_subscriber_sees_new_frames_only() {
        let entry = entry();
        entry.publish_frame(Bytes::from_static(b"old"));

        let mut frames = entry.subscribe_frames();
        // The frame published before subscribing counts as seen
        assert_eq!(frames.borrow_and_update().clone(), Some(Bytes::from_static(b"old")));

        entry.publish_frame(Bytes::from_static(b"new"));
        frames.changed().await.unwrap();
        assert_eq!(frames.borrow_and_update().clone(), Some(Bytes::from_static(b"new")));
    }

    #[test]
    fn test_stats_snapshot() {
        let entry = entry();
        let _viewer = entry.add_viewer();
        entry.publish_frame(Bytes::from_static(b"frame"));

        let stats = entry.stats();
        assert_eq!(stats.name, "cam1");
        assert_eq!(stats.location, "hallway");
        assert_eq!(stats.viewers, 1);
        assert!(stats.has_frame);
        assert!(!stats.active);
    }
}
