//! Registry configuration

use std::time::Duration;

/// Tuning knobs for camera lifecycle and upstream I/O
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How often viewer demand is reconciled against extractor state
    pub reconcile_interval: Duration,

    /// Timeout for opening the upstream stream connection
    pub connect_timeout: Duration,

    /// Deadline for a one-shot capture (connect plus read)
    pub capture_timeout: Duration,

    /// Cap on the frame accumulation buffer before resynchronization
    pub max_frame_buffer: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reconcile_interval: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(10),
            capture_timeout: Duration::from_secs(5),
            max_frame_buffer: 2 * 1024 * 1024, // 2MB, far above any ESP32-class frame
        }
    }
}

impl RegistryConfig {
    /// Set the reconciliation interval
    pub fn reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }

    /// Set the upstream connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the one-shot capture deadline
    pub fn capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    /// Set the accumulation buffer cap
    pub fn max_frame_buffer(mut self, bytes: usize) -> Self {
        self.max_frame_buffer = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.reconcile_interval, Duration::from_millis(50));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.capture_timeout, Duration::from_secs(5));
        assert_eq!(config.max_frame_buffer, 2 * 1024 * 1024);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .reconcile_interval(Duration::from_millis(100))
            .connect_timeout(Duration::from_secs(5))
            .capture_timeout(Duration::from_secs(2))
            .max_frame_buffer(64 * 1024);

        assert_eq!(config.reconcile_interval, Duration::from_millis(100));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.capture_timeout, Duration::from_secs(2));
        assert_eq!(config.max_frame_buffer, 64 * 1024);
    }
}
