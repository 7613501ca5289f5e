//! MySQL connection implementation

use async_trait::async_trait;
use mysql_async::{
    Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row as MySqlRow, consts::ColumnType,
    prelude::*,
};
use mystat_core::{Connection, ConnectionConfig, MystatError, QueryResult, Result, Row, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// MySQL connection wrapper.
///
/// Backed by a pool pinned to exactly one physical connection so every
/// statement of a sampling epoch runs on the same session.
pub struct MySqlConnection {
    pool: Pool,
    closed: AtomicBool,
}

impl MySqlConnection {
    /// Connect to a MySQL instance
    #[tracing::instrument(skip(config), fields(addr = %config.addr, user = %config.user))]
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        tracing::info!("connecting to MySQL instance");

        let mut opts_builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(config.host())
            .tcp_port(config.port())
            .user(Some(config.user.as_str()))
            .init(vec![format!("SET NAMES {}", config.charset)]);

        if let Some(p) = &config.password {
            opts_builder = opts_builder.pass(Some(p.as_str()));
        }

        let constraints = PoolConstraints::new(1, 1).ok_or_else(|| {
            MystatError::Connection("Failed to configure MySQL pool constraints (min=1, max=1)".into())
        })?;

        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_reset_connection(false);
        opts_builder = opts_builder.pool_opts(pool_opts);

        let pool = Pool::new(Opts::from(opts_builder));

        // Verify connectivity by acquiring and releasing a connection
        let conn = pool
            .get_conn()
            .await
            .map_err(|e| classify_error("Failed to connect to MySQL", e))?;
        drop(conn);

        tracing::info!("MySQL connection established");
        Ok(Self {
            pool,
            closed: AtomicBool::new(false),
        })
    }
}

/// Split driver errors into the workspace taxonomy.
///
/// Errors reported by the server itself (syntax, privileges, access
/// denied) are query errors; anything on the transport side means the
/// session is unusable.
fn classify_error(context: &str, err: mysql_async::Error) -> MystatError {
    match err {
        mysql_async::Error::Server(ref server) => {
            MystatError::Query(format!("{}: {} (code {})", context, server.message, server.code))
        }
        other => MystatError::Connection(format!("{}: {}", context, other)),
    }
}

/// Convert mysql_async Value to our Value type, using column type metadata
/// to correctly interpret byte strings from the text protocol.
pub(crate) fn mysql_value_to_value(val: mysql_async::Value, col_type: ColumnType) -> Value {
    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => match col_type {
                ColumnType::MYSQL_TYPE_TINY
                | ColumnType::MYSQL_TYPE_SHORT
                | ColumnType::MYSQL_TYPE_LONG
                | ColumnType::MYSQL_TYPE_LONGLONG
                | ColumnType::MYSQL_TYPE_INT24
                | ColumnType::MYSQL_TYPE_YEAR => match s.parse::<i64>() {
                    Ok(i) => Value::Int64(i),
                    Err(_) => s.parse::<u64>().map(Value::UInt64).unwrap_or(Value::String(s)),
                },
                ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
                    s.parse::<f64>().map(Value::Float64).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                    Value::Decimal(s)
                }
                _ => Value::String(s),
            },
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => Value::UInt64(u),
        mysql_async::Value::Float(f) => Value::Float64(f as f64),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                date.map(Value::Date).unwrap_or_else(|| {
                    Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
                })
            } else {
                date.and_then(|d| d.and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro))
                    .map(Value::DateTime)
                    .unwrap_or_else(|| {
                        Value::String(format!(
                            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                            year, month, day, hour, min, sec
                        ))
                    })
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + u32::from(hours);
            let sign = if negative { "-" } else { "" };
            Value::String(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                sign, total_hours, mins, secs, micros
            ))
        }
    }
}

fn convert_rows(mysql_rows: Vec<MySqlRow>) -> (Vec<String>, Vec<Row>) {
    let Some(first_row) = mysql_rows.first() else {
        return (Vec::new(), Vec::new());
    };

    let columns: Vec<String> = first_row
        .columns_ref()
        .iter()
        .map(|col| col.name_str().to_string())
        .collect();
    let column_types: Vec<ColumnType> = first_row
        .columns_ref()
        .iter()
        .map(|col| col.column_type())
        .collect();

    let rows = mysql_rows
        .into_iter()
        .map(|mysql_row| {
            let values = column_types
                .iter()
                .enumerate()
                .map(|(idx, col_type)| {
                    let mysql_val: mysql_async::Value =
                        mysql_row.get(idx).unwrap_or(mysql_async::Value::NULL);
                    mysql_value_to_value(mysql_val, *col_type)
                })
                .collect();
            Row::new(columns.clone(), values)
        })
        .collect();

    (columns, rows)
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str) -> Result<QueryResult> {
        if self.is_closed() {
            return Err(MystatError::Connection("connection already closed".into()));
        }

        let start_time = std::time::Instant::now();
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| classify_error("Failed to get MySQL connection", e))?;

        let mysql_rows: Vec<MySqlRow> = conn
            .query(sql)
            .await
            .map_err(|e| classify_error("Failed to execute query", e))?;

        let (columns, rows) = convert_rows(mysql_rows);
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms = execution_time_ms,
            "query executed successfully"
        );

        Ok(QueryResult {
            columns,
            rows,
            execution_time_ms,
        })
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("closing MySQL connection pool");
        self.pool
            .clone()
            .disconnect()
            .await
            .map_err(|e| classify_error("Failed to close MySQL connection", e))
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
