//! SQL for the per-cycle reads

use mystat_core::{MystatError, Result};

use crate::counters::CounterName;

/// Query builder for the sampler's status reads
pub struct StatusQuery;

impl StatusQuery {
    /// Thread totals from the process list
    pub fn threads() -> &'static str {
        r#"
        SELECT
            COUNT(*) AS total_threads,
            IFNULL(SUM(CASE WHEN command <> 'Sleep' AND user <> 'system user'
                THEN 1 ELSE 0 END), 0) AS active_threads,
            IFNULL(SUM(CASE WHEN state LIKE 'Waiting for %'
                AND user NOT IN ('system user', 'event_scheduler')
                THEN 1 ELSE 0 END), 0) AS waiting_threads
        FROM information_schema.processlist
        "#
    }

    /// Open InnoDB transactions, lock waits and the oldest transaction's age
    pub fn transactions() -> &'static str {
        r#"
        SELECT
            COUNT(*) AS total_trx,
            IFNULL(SUM(CASE WHEN trx_state = 'LOCK WAIT' THEN 1 ELSE 0 END), 0) AS waiting_trx,
            GREATEST(IFNULL(MAX(TIMESTAMPDIFF(SECOND, trx_started, NOW())), 0), 0) AS trx_max_sec
        FROM information_schema.innodb_trx
        "#
    }

    pub fn replica_status() -> &'static str {
        "SHOW SLAVE STATUS"
    }

    /// The only spelling MySQL 8.4 and later accept
    pub fn replica_status_fallback() -> &'static str {
        "SHOW REPLICA STATUS"
    }

    /// One batched read of every tracked counter
    pub fn global_status() -> String {
        let names: Vec<String> = CounterName::all()
            .map(|name| format!("'{}'", name.as_str()))
            .collect();
        format!(
            "SHOW GLOBAL STATUS WHERE Variable_name IN ({})",
            names.join(", ")
        )
    }

    /// Check that the queries above can run against `driver_name`
    pub fn ensure_supported(driver_name: &str) -> Result<()> {
        match driver_name {
            "mysql" | "mariadb" => Ok(()),
            _ => Err(MystatError::NotSupported(format!(
                "status sampling not available for driver: {}",
                driver_name
            ))),
        }
    }
}
