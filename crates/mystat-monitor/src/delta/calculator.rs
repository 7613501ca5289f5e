//! Delta calculator

use std::ops::Index;

use chrono::{DateTime, Local};
use mystat_core::{MystatError, Result};
use serde::{Deserialize, Serialize};

use super::{InstantaneousFacts, MetricsRecord, RateMetrics};
use crate::counters::{CounterName, CounterSnapshot, TRACKED_COUNTERS};

/// InnoDB default page size
pub const DEFAULT_PAGE_SIZE_KB: u64 = 16;

const BYTES_PER_MB: u64 = 1_048_576;
const KB_PER_MB: u64 = 1024;

/// Configuration for delta computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// Buffer pool page size used to turn page counts into MB
    pub page_size_kb: u64,
}

impl DeltaConfig {
    pub fn new(page_size_kb: u64) -> Self {
        Self { page_size_kb }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size_kb == 0 {
            return Err(MystatError::Configuration(
                "page size must be at least 1 KB".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE_KB)
    }
}

/// Clamped per-counter deltas between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDeltas {
    values: [u64; TRACKED_COUNTERS],
    resets: Vec<CounterName>,
}

impl CounterDeltas {
    /// Compute `curr - prev` for every tracked counter.
    ///
    /// A decrease clamps to 0. Monotonic counters that decreased are listed
    /// in [`CounterDeltas::resets`]; gauges are clamped silently.
    pub fn between(prev: &CounterSnapshot, curr: &CounterSnapshot) -> Result<Self> {
        let mut values = [0u64; TRACKED_COUNTERS];
        let mut resets = Vec::new();

        for name in CounterName::all() {
            let before = prev.require(name)?;
            let after = curr.require(name)?;
            values[name.index()] = match after.checked_sub(before) {
                Some(delta) => delta,
                None => {
                    if !name.is_gauge() {
                        resets.push(name);
                    }
                    0
                }
            };
        }

        Ok(Self { values, resets })
    }

    pub fn get(&self, name: CounterName) -> u64 {
        self.values[name.index()]
    }

    pub fn resets(&self) -> &[CounterName] {
        &self.resets
    }
}

impl Index<CounterName> for CounterDeltas {
    type Output = u64;

    fn index(&self, name: CounterName) -> &u64 {
        &self.values[name.index()]
    }
}

/// `num / den` rounded half-to-even, without going through floating point.
///
/// `den` must be non-zero.
pub fn div_round_half_even(num: u128, den: u128) -> u64 {
    let quotient = num / den;
    let remainder = num % den;
    let twice = remainder * 2;
    let rounded = if twice > den || (twice == den && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Builds [`MetricsRecord`]s from pairs of snapshots
#[derive(Debug, Clone, Default)]
pub struct DeltaCalculator {
    config: DeltaConfig,
}

impl DeltaCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DeltaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    /// Compute the record for one sampling window.
    ///
    /// Both snapshots must be complete and `curr` must be strictly later
    /// than `prev`; otherwise this fails with [`MystatError::DataIntegrity`].
    pub fn compute(
        &self,
        prev: &CounterSnapshot,
        curr: &CounterSnapshot,
        facts: InstantaneousFacts,
        now: DateTime<Local>,
    ) -> Result<MetricsRecord> {
        prev.validate()
            .map_err(|e| MystatError::DataIntegrity(format!("previous snapshot: {}", e)))?;
        curr.validate()
            .map_err(|e| MystatError::DataIntegrity(format!("current snapshot: {}", e)))?;

        let window = (curr.captured_at() - prev.captured_at())
            .to_std()
            .ok()
            .filter(|w| !w.is_zero())
            .ok_or_else(|| {
                MystatError::DataIntegrity(format!(
                    "snapshot taken at {} is not after {}",
                    curr.captured_at(),
                    prev.captured_at()
                ))
            })?;

        let deltas = CounterDeltas::between(prev, curr)?;
        if !deltas.resets().is_empty() {
            tracing::warn!(
                counters = ?deltas.resets(),
                "counter reset detected, clamping deltas to zero"
            );
        }

        let rates = self.rates(&deltas);
        Ok(MetricsRecord::new(
            now,
            facts,
            rates,
            window,
            deltas.resets().to_vec(),
        ))
    }

    fn rates(&self, d: &CounterDeltas) -> RateMetrics {
        let bytes_mb =
            |name: CounterName| div_round_half_even(d[name] as u128, BYTES_PER_MB as u128);
        let pages_mb = |name: CounterName| {
            div_round_half_even(
                d[name] as u128 * self.config.page_size_kb as u128,
                KB_PER_MB as u128,
            )
        };

        RateMetrics {
            new_connections: d[CounterName::Connections],
            bytes_sent_mb: bytes_mb(CounterName::BytesSent),
            bytes_received_mb: bytes_mb(CounterName::BytesReceived),

            sorted_rows: d[CounterName::SortRows],
            read_rows: d[CounterName::InnodbRowsRead],
            inserted_rows: d[CounterName::InnodbRowsInserted],
            updated_rows: d[CounterName::InnodbRowsUpdated],
            deleted_rows: d[CounterName::InnodbRowsDeleted],

            selects: d[CounterName::ComSelect],
            inserts: d[CounterName::ComInsert],
            updates: d[CounterName::ComUpdate],
            deletes: d[CounterName::ComDelete],
            begins: d[CounterName::ComBegin],
            commits: d[CounterName::ComCommit],
            rollbacks: d[CounterName::ComRollback],

            temp_tables_created: d[CounterName::CreatedTmpTables],
            temp_tables_on_disk: d[CounterName::CreatedTmpDiskTables],

            buffer_pool_logical_read_mb: pages_mb(CounterName::InnodbBufferPoolReadRequests),
            buffer_pool_physical_read_mb: pages_mb(CounterName::InnodbBufferPoolReads),
            buffer_pool_write_mb: pages_mb(CounterName::InnodbBufferPoolWriteRequests),
            buffer_pool_dirty_mb: pages_mb(CounterName::InnodbBufferPoolPagesDirty),
            buffer_pool_flushed_mb: pages_mb(CounterName::InnodbBufferPoolPagesFlushed),
            buffer_pool_free_mb: pages_mb(CounterName::InnodbBufferPoolPagesFree),
        }
    }
}
