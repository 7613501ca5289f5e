//! Snapshot fetcher

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use mystat_core::{Connection, MystatError, QueryResult, Result};

use super::{
    StatusQuery, parse_global_status, parse_replica_lag, parse_thread_counts,
    parse_transaction_counts,
};
use crate::counters::CounterSnapshot;
use crate::delta::InstantaneousFacts;

/// Reads facts and counter snapshots over a live connection.
///
/// Errors propagate unchanged; retrying is the sampler's business.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    global_status_sql: String,
    /// Replica status statement the server accepted, once known
    replica_sql: OnceLock<&'static str>,
}

impl SnapshotFetcher {
    pub fn new() -> Self {
        Self {
            global_status_sql: StatusQuery::global_status(),
            replica_sql: OnceLock::new(),
        }
    }

    /// Thread, transaction and replication state
    #[tracing::instrument(skip_all, fields(driver = conn.driver_name()))]
    pub async fn fetch_facts<C>(&self, conn: &C) -> Result<InstantaneousFacts>
    where
        C: Connection + ?Sized,
    {
        let (total, active, waiting) =
            parse_thread_counts(&conn.query(StatusQuery::threads()).await?)?;
        let (trx, trx_waiting, trx_max_age) =
            parse_transaction_counts(&conn.query(StatusQuery::transactions()).await?)?;
        let lag = parse_replica_lag(&self.query_replica_status(conn).await?)?;

        tracing::debug!(total, active, waiting, trx, ?lag, "fetched instantaneous facts");
        Ok(InstantaneousFacts::new()
            .with_threads(total, active, waiting)
            .with_transactions(trx, trx_waiting, trx_max_age)
            .with_replica_lag(lag))
    }

    /// Tracked counters, stamped with `captured_at`.
    ///
    /// The returned snapshot may be incomplete; see
    /// [`CounterSnapshot::validate`].
    pub async fn fetch_counters<C>(
        &self,
        conn: &C,
        captured_at: DateTime<Utc>,
    ) -> Result<CounterSnapshot>
    where
        C: Connection + ?Sized,
    {
        let result = conn.query(&self.global_status_sql).await?;
        let snapshot = parse_global_status(&result, captured_at)?;
        tracing::debug!(
            rows = result.row_count(),
            missing = snapshot.missing().len(),
            "fetched counter snapshot"
        );
        Ok(snapshot)
    }

    /// `SHOW SLAVE STATUS`, or `SHOW REPLICA STATUS` once the server has
    /// rejected the former
    async fn query_replica_status<C>(&self, conn: &C) -> Result<QueryResult>
    where
        C: Connection + ?Sized,
    {
        if let Some(sql) = self.replica_sql.get() {
            return conn.query(sql).await;
        }

        match conn.query(StatusQuery::replica_status()).await {
            Ok(result) => {
                let _ = self.replica_sql.set(StatusQuery::replica_status());
                Ok(result)
            }
            Err(MystatError::Query(reason)) => {
                tracing::debug!(%reason, "legacy replica status rejected, retrying");
                let result = conn.query(StatusQuery::replica_status_fallback()).await?;
                let _ = self.replica_sql.set(StatusQuery::replica_status_fallback());
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for SnapshotFetcher {
    fn default() -> Self {
        Self::new()
    }
}
