//! Connection factory and bounded connect-with-retry

use std::sync::Arc;

use async_trait::async_trait;
use mystat_core::{Connection, Result};
use serde::{Deserialize, Serialize};

use super::BackoffStrategy;

/// Configuration for reconnection behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Retries after the first failed attempt (0 = fail immediately)
    max_attempts: u32,
    /// Backoff strategy for delays between retries
    backoff: BackoffStrategy,
}

impl ReconnectConfig {
    /// Create a new reconnect configuration
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Get the maximum number of retry attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the backoff strategy
    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self::new(3, BackoffStrategy::default())
    }
}

/// Factory trait for creating connections
///
/// The sampler asks the factory for a fresh connection at every epoch.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Create a new connection
    async fn create(&self) -> Result<Arc<dyn Connection>>;
}

#[async_trait]
impl<T: ConnectionFactory + ?Sized> ConnectionFactory for Arc<T> {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        (**self).create().await
    }
}

/// Open a connection, retrying connection failures with backoff.
///
/// Only `MystatError::Connection` is retried; any other error (bad
/// configuration, authentication reported as a query error, ...) is
/// returned as-is on the first occurrence.
pub async fn connect_with_retry<F>(factory: &F, config: &ReconnectConfig) -> Result<Arc<dyn Connection>>
where
    F: ConnectionFactory + ?Sized,
{
    let mut attempt = 0u32;
    loop {
        match factory.create().await {
            Ok(conn) => {
                if attempt > 0 {
                    tracing::info!(attempts = attempt + 1, "connection established after retry");
                }
                return Ok(conn);
            }
            Err(e) if e.is_connection_error() && attempt < config.max_attempts() => {
                let delay = config.backoff().calculate_delay(attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "connection attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, attempts = attempt + 1, "giving up on connection");
                return Err(e);
            }
        }
    }
}
