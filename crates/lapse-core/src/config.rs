//! Configuration for the expiration queue
//!
//! Centralized configuration for queue tuning knobs, replacing hardcoded
//! constants with configurable values.

use std::time::Duration;

/// Configuration for [`ExpirationQueue`](crate::queue::ExpirationQueue)
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Remaining waits at or below this threshold are treated as already due
    pub due_threshold: Duration,
    /// Initial capacity of the intake buffer
    pub intake_initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            due_threshold: Duration::from_millis(1),
            intake_initial_capacity: 64,
        }
    }
}

/// Configuration profiles for different use cases
impl QueueConfig {
    /// Configuration optimized for low latency
    ///
    /// Tightens the due threshold so near-term deadlines are not rounded
    /// down to "already due", and sizes the intake buffer for bursts.
    pub fn low_latency() -> Self {
        Self {
            due_threshold: Duration::from_micros(100),
            intake_initial_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert_eq!(config.due_threshold, Duration::from_millis(1));
        assert_eq!(config.intake_initial_capacity, 64);
    }

    #[test]
    fn test_low_latency_profile() {
        let config = QueueConfig::low_latency();
        assert!(config.due_threshold < QueueConfig::default().due_threshold);
        assert!(config.intake_initial_capacity >= QueueConfig::default().intake_initial_capacity);
    }
}
