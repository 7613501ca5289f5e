//! Result parsing for the status reads.
//!
//! A value that cannot be read as a non-negative integer is a
//! [`MystatError::DataIntegrity`] failure, never a zero.

use chrono::{DateTime, Utc};
use mystat_core::{MystatError, QueryResult, Row, Value};

use crate::counters::CounterSnapshot;
use crate::delta::ReplicaLag;

/// Replica status lag columns, pre-8.0.22 name first
pub const REPLICA_LAG_COLUMNS: [&str; 2] = ["Seconds_Behind_Master", "Seconds_Behind_Source"];

fn single_row<'a>(result: &'a QueryResult, source: &str) -> mystat_core::Result<&'a Row> {
    result
        .first()
        .ok_or_else(|| MystatError::DataIntegrity(format!("{} returned no rows", source)))
}

fn column_u64(row: &Row, column: &str, source: &str) -> mystat_core::Result<u64> {
    let value = row.get_by_name(column).ok_or_else(|| {
        MystatError::DataIntegrity(format!("{} result has no column {}", source, column))
    })?;
    value.as_u64().ok_or_else(|| {
        MystatError::DataIntegrity(format!(
            "{}.{} is not a non-negative integer: {}",
            source, column, value
        ))
    })
}

/// `(total, active, waiting)` thread counts
pub fn parse_thread_counts(result: &QueryResult) -> mystat_core::Result<(u64, u64, u64)> {
    let row = single_row(result, "processlist")?;
    Ok((
        column_u64(row, "total_threads", "processlist")?,
        column_u64(row, "active_threads", "processlist")?,
        column_u64(row, "waiting_threads", "processlist")?,
    ))
}

/// `(total, lock waiting, max age in seconds)` transaction figures
pub fn parse_transaction_counts(result: &QueryResult) -> mystat_core::Result<(u64, u64, u64)> {
    let row = single_row(result, "innodb_trx")?;
    Ok((
        column_u64(row, "total_trx", "innodb_trx")?,
        column_u64(row, "waiting_trx", "innodb_trx")?,
        column_u64(row, "trx_max_sec", "innodb_trx")?,
    ))
}

/// Replication lag from `SHOW SLAVE STATUS`.
///
/// No rows means the server is not a replica. With several channels the
/// worst one is reported.
pub fn parse_replica_lag(result: &QueryResult) -> mystat_core::Result<ReplicaLag> {
    let mut lag = ReplicaLag::NotReplica;
    for row in &result.rows {
        let channel = match REPLICA_LAG_COLUMNS
            .iter()
            .find_map(|column| row.get_by_name(column))
        {
            None => {
                tracing::warn!(columns = ?row.columns(), "replica status has no lag column");
                ReplicaLag::Unknown
            }
            Some(Value::Null) => ReplicaLag::Unknown,
            Some(value) => ReplicaLag::Seconds(value.as_u64().ok_or_else(|| {
                MystatError::DataIntegrity(format!(
                    "replica lag is not a number of seconds: {}",
                    value
                ))
            })?),
        };
        lag = lag.worst(channel);
    }
    Ok(lag)
}

/// Build a snapshot from `SHOW GLOBAL STATUS` rows.
///
/// Value parsing itself is deferred to [`CounterSnapshot::parse`], which
/// records unusable values instead of failing here.
pub fn parse_global_status(
    result: &QueryResult,
    captured_at: DateTime<Utc>,
) -> mystat_core::Result<CounterSnapshot> {
    let mut pairs = Vec::with_capacity(result.row_count());
    for row in &result.rows {
        let name = row
            .get_by_name("Variable_name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MystatError::DataIntegrity("global status row without Variable_name".to_string())
            })?;
        let value = row.get_by_name("Value").ok_or_else(|| {
            MystatError::DataIntegrity(format!("global status row {} has no Value", name))
        })?;
        pairs.push((name.to_string(), value.to_string()));
    }
    Ok(CounterSnapshot::parse(pairs, captured_at))
}
