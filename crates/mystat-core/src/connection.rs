//! Connection trait

use crate::{QueryResult, Result};
use async_trait::async_trait;

/// A read-only database connection.
///
/// The monitor never writes, so the trait only exposes querying and
/// lifecycle management.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a statement that returns rows
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Verify the connection answers a trivial statement
    async fn ping(&self) -> Result<()> {
        tracing::debug!(driver = self.driver_name(), "pinging connection");
        self.query("SELECT 1").await.map(|_| ())
    }

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}
