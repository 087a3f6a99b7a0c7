//! Camera registry implementation
//!
//! The central registry that owns every configured camera and runs the
//! demand reconciliation pass. The camera set is fixed at startup, so the
//! map itself needs no locking; all mutable state lives inside the entries.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::config::RegistryConfig;
use super::entry::{CameraEntry, CameraInfo, CameraStats};

/// Registry of all configured cameras
pub struct CameraRegistry {
    /// Map of camera name to entry, immutable after construction
    cameras: HashMap<String, Arc<CameraEntry>>,

    /// Configuration
    config: RegistryConfig,
}

impl CameraRegistry {
    /// Build the registry from configured cameras
    pub fn new(cameras: impl IntoIterator<Item = CameraInfo>, config: RegistryConfig) -> Self {
        let cameras = cameras
            .into_iter()
            .map(|info| (info.name.clone(), Arc::new(CameraEntry::new(info))))
            .collect();
        Self { cameras, config }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Look up a camera by name (exact, case-sensitive)
    pub fn get(&self, name: &str) -> Option<Arc<CameraEntry>> {
        self.cameras.get(name).cloned()
    }

    /// Number of configured cameras
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Whether no cameras are configured
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Iterate over all camera entries
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CameraEntry>> {
        self.cameras.values()
    }

    /// Total viewers across all cameras
    pub fn total_viewers(&self) -> u32 {
        self.cameras.values().map(|entry| entry.viewer_count()).sum()
    }

    /// Run one reconciliation pass over every camera
    ///
    /// Starts an extractor where demand appeared, stops one where it
    /// vanished, and clears finished tasks. One failing camera never blocks
    /// the others; the pass itself does no network I/O.
    pub fn reconcile(&self) {
        for entry in self.cameras.values() {
            entry.reconcile(&self.config);
        }
    }

    /// Spawn the background reconciliation task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_reconcile_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        let interval = registry.config.reconcile_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                registry.reconcile();
            }
        })
    }

    /// Signal every running extractor to stop
    pub fn stop_all(&self) {
        for entry in self.cameras.values() {
            entry.stop_extractor();
        }
    }

    /// Snapshot of every camera for status reporting, ordered by name
    pub fn stats(&self) -> RegistryStats {
        let mut cameras: Vec<CameraStats> =
            self.cameras.values().map(|entry| entry.stats()).collect();
        cameras.sort_by(|a, b| a.name.cmp(&b.name));
        RegistryStats { cameras }
    }
}

/// Point-in-time statistics for the whole registry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    /// Per-camera snapshots
    pub cameras: Vec<CameraStats>,
}
