//! Per-cycle metrics record

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::InstantaneousFacts;
use crate::counters::CounterName;

/// Metrics derived from counter deltas over one sampling window.
///
/// Values are absolute amounts over the window, not per-second rates.
/// `*_mb` fields are rounded half-to-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RateMetrics {
    pub new_connections: u64,
    pub bytes_sent_mb: u64,
    pub bytes_received_mb: u64,

    pub sorted_rows: u64,
    pub read_rows: u64,
    pub inserted_rows: u64,
    pub updated_rows: u64,
    pub deleted_rows: u64,

    pub selects: u64,
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
    pub begins: u64,
    pub commits: u64,
    pub rollbacks: u64,

    pub temp_tables_created: u64,
    pub temp_tables_on_disk: u64,

    pub buffer_pool_logical_read_mb: u64,
    pub buffer_pool_physical_read_mb: u64,
    pub buffer_pool_write_mb: u64,
    pub buffer_pool_dirty_mb: u64,
    pub buffer_pool_flushed_mb: u64,
    pub buffer_pool_free_mb: u64,
}

/// Everything rendered for one cycle. Built by the delta calculator and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    timestamp: DateTime<Local>,
    facts: InstantaneousFacts,
    rates: RateMetrics,
    window: Duration,
    reset_counters: Vec<CounterName>,
}

impl MetricsRecord {
    pub(crate) fn new(
        timestamp: DateTime<Local>,
        facts: InstantaneousFacts,
        rates: RateMetrics,
        window: Duration,
        reset_counters: Vec<CounterName>,
    ) -> Self {
        Self {
            timestamp,
            facts,
            rates,
            window,
            reset_counters,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn facts(&self) -> &InstantaneousFacts {
        &self.facts
    }

    pub fn rates(&self) -> &RateMetrics {
        &self.rates
    }

    /// Elapsed time between the two snapshots
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Monotonic counters that went backwards and were clamped to zero
    pub fn reset_counters(&self) -> &[CounterName] {
        &self.reset_counters
    }

    pub fn had_counter_reset(&self) -> bool {
        !self.reset_counters.is_empty()
    }
}
