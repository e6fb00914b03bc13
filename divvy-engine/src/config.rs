//! Configuration types for the engine

use crate::error::{EngineError, Result};
use std::time::Duration;

/// Default slack margin in bytes
pub const DEFAULT_SLACK_MARGIN: usize = 1024;

/// Largest accepted slack margin (1 GiB)
pub const MAX_SLACK_MARGIN: usize = 1 << 30;

/// Default deadline for a single neighbour exchange
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of workers in the group
    pub group_size: usize,
    /// Spare bytes per buffer for the right neighbour's prefix.
    /// Every record must be shorter than this.
    pub slack_margin: usize,
    /// Deadline for each send and receive
    pub exchange_timeout: Duration,
    /// How often a blocked receive checks whether the group was aborted
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            group_size: num_cpus::get(),
            slack_margin: DEFAULT_SLACK_MARGIN,
            exchange_timeout: DEFAULT_EXCHANGE_TIMEOUT,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl EngineConfig {
    /// Default configuration for a group of `group_size` workers
    pub fn with_group_size(group_size: usize) -> Self {
        Self {
            group_size,
            ..Default::default()
        }
    }

    /// Set the slack margin
    pub fn slack_margin(mut self, bytes: usize) -> Self {
        self.slack_margin = bytes;
        self
    }

    /// Set the exchange deadline
    pub fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(EngineError::ConfigError(
                "group size must be greater than 0".to_string(),
            ));
        }

        if self.slack_margin == 0 {
            return Err(EngineError::ConfigError(
                "slack margin must be greater than 0".to_string(),
            ));
        }

        if self.slack_margin > MAX_SLACK_MARGIN {
            return Err(EngineError::ConfigError(format!(
                "slack margin of {} bytes exceeds the maximum of {MAX_SLACK_MARGIN}",
                self.slack_margin
            )));
        }

        if self.exchange_timeout.is_zero() {
            return Err(EngineError::ConfigError(
                "exchange timeout must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval.is_zero() || self.poll_interval > self.exchange_timeout {
            return Err(EngineError::ConfigError(
                "poll interval must be positive and no longer than the exchange timeout"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
