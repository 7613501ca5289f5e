//! Sampler configuration

use std::time::Duration;

use mystat_connection::ReconnectConfig;
use mystat_core::{MystatError, Result};
use serde::{Deserialize, Serialize};

use crate::delta::DeltaConfig;

/// Default time between rows
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Time between the two snapshots of one row
pub const SAMPLING_WINDOW: Duration = Duration::from_secs(1);

/// Cycles sampled over one connection before it is recycled
pub const DEFAULT_CYCLES_PER_EPOCH: u32 = 20;

/// Configuration for the sampling loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Time from the start of one row's window to the start of the next
    pub interval: Duration,
    pub window: Duration,
    pub cycles_per_epoch: u32,
    /// Stop after this many data rows; `None` runs until shut down
    pub max_rows: Option<u64>,
    pub reconnect: ReconnectConfig,
    pub delta: DeltaConfig,
}

impl SamplerConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_cycles_per_epoch(mut self, cycles: u32) -> Self {
        self.cycles_per_epoch = cycles;
        self
    }

    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_delta(mut self, delta: DeltaConfig) -> Self {
        self.delta = delta;
        self
    }

    /// Sleep after each row so rows start `interval` apart
    pub fn pause_after_row(&self) -> Duration {
        self.interval.saturating_sub(self.window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.is_zero() {
            return Err(MystatError::Configuration(
                "sampling window must be positive".to_string(),
            ));
        }
        if self.interval <= self.window {
            return Err(MystatError::Configuration(format!(
                "interval ({}s) must be longer than the sampling window ({}s)",
                self.interval.as_secs_f64(),
                self.window.as_secs_f64()
            )));
        }
        if self.cycles_per_epoch == 0 {
            return Err(MystatError::Configuration(
                "cycles per connection must be at least 1".to_string(),
            ));
        }
        if self.max_rows == Some(0) {
            return Err(MystatError::Configuration(
                "row count must be at least 1".to_string(),
            ));
        }
        self.delta.validate()
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            window: SAMPLING_WINDOW,
            cycles_per_epoch: DEFAULT_CYCLES_PER_EPOCH,
            max_rows: None,
            reconnect: ReconnectConfig::default(),
            delta: DeltaConfig::default(),
        }
    }
}
