//! Exponential backoff calculator for connection retry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff strategy for connection retries.
///
/// Delays double with each attempt, up to a configurable maximum.
///
/// # Example
///
/// ```
/// use mystat_connection::BackoffStrategy;
/// use std::time::Duration;
///
/// let backoff = BackoffStrategy::new(500, 30_000);
///
/// assert_eq!(backoff.calculate_delay(0), Duration::from_millis(500));
/// assert_eq!(backoff.calculate_delay(1), Duration::from_millis(1000));
/// assert!(backoff.calculate_delay(20) <= Duration::from_millis(30_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffStrategy {
    /// Initial delay in milliseconds for the first retry
    initial_ms: u64,
    /// Maximum delay in milliseconds (cap for exponential growth)
    max_ms: u64,
}

impl BackoffStrategy {
    /// Create a new backoff strategy with the given initial and maximum delays.
    ///
    /// The initial delay is at least 1ms and the maximum never drops below
    /// the initial delay.
    pub fn new(initial_ms: u64, max_ms: u64) -> Self {
        let initial_ms = initial_ms.max(1);
        Self {
            initial_ms,
            max_ms: max_ms.max(initial_ms),
        }
    }

    /// Calculate the delay for a zero-based attempt number.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay_ms = self.initial_ms.saturating_mul(factor).min(self.max_ms);
        Duration::from_millis(delay_ms)
    }
}

impl Default for BackoffStrategy {
    /// 500ms initial, 30 seconds max
    fn default() -> Self {
        Self::new(500, 30_000)
    }
}
