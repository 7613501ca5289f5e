//! Scripted MySQL stand-ins shared by the monitor's unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mystat_connection::ConnectionFactory;
use mystat_core::{Connection, MystatError, QueryResult, Result, Value};

use crate::counters::CounterName;
use crate::sampler::OutputSink;

/// Produces the `SHOW GLOBAL STATUS` rows for the n-th status read
pub type StatusScript = dyn Fn(usize) -> Vec<(String, Value)> + Send + Sync;

/// Every tracked counter at `n * step` on the n-th read
pub fn counting_status(step: u64) -> Arc<StatusScript> {
    Arc::new(move |n: usize| -> Vec<(String, Value)> {
        CounterName::all()
            .map(|name| {
                let value = (n as u64 * step).to_string();
                (name.as_str().to_string(), Value::String(value))
            })
            .collect()
    })
}

/// `counting_status` without one counter
pub fn status_without(step: u64, dropped: CounterName) -> Arc<StatusScript> {
    let full = counting_status(step);
    Arc::new(move |n: usize| -> Vec<(String, Value)> {
        full(n)
            .into_iter()
            .filter(|(name, _)| name != dropped.as_str())
            .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailKind {
    Connection,
    Query,
}

impl FailKind {
    fn error(self, sql: &str) -> MystatError {
        match self {
            FailKind::Connection => {
                MystatError::Connection(format!("lost connection during {}", sql))
            }
            FailKind::Query => MystatError::Query(format!("access denied for {}", sql)),
        }
    }
}

/// Answers the sampler's queries by matching on the SQL text
pub struct MockConnection {
    status: Arc<StatusScript>,
    status_reads: AtomicUsize,
    replica: QueryResult,
    failure: Option<(&'static str, FailKind)>,
    closed: AtomicBool,
    closes: Arc<AtomicUsize>,
    statements: Mutex<Vec<String>>,
}

impl MockConnection {
    pub fn new(status: Arc<StatusScript>) -> Self {
        Self {
            status,
            status_reads: AtomicUsize::new(0),
            replica: QueryResult::default(),
            failure: None,
            closed: AtomicBool::new(false),
            closes: Arc::new(AtomicUsize::new(0)),
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Every statement received, failed ones included
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn with_replica(mut self, replica: QueryResult) -> Self {
        self.replica = replica;
        self
    }

    /// Fail every query whose SQL contains `fragment`
    pub fn failing_on(mut self, fragment: &'static str, kind: FailKind) -> Self {
        self.failure = Some((fragment, kind));
        self
    }

    pub fn with_close_counter(mut self, closes: Arc<AtomicUsize>) -> Self {
        self.closes = closes;
        self
    }

    fn threads() -> QueryResult {
        QueryResult::from_rows(
            vec![
                "total_threads".into(),
                "active_threads".into(),
                "waiting_threads".into(),
            ],
            vec![vec![
                Value::Int64(120),
                Value::Decimal("8".into()),
                Value::Decimal("2".into()),
            ]],
        )
    }

    fn transactions() -> QueryResult {
        QueryResult::from_rows(
            vec!["total_trx".into(), "waiting_trx".into(), "trx_max_sec".into()],
            vec![vec![
                Value::Int64(5),
                Value::Decimal("1".into()),
                Value::Int64(42),
            ]],
        )
    }
}

/// A replica status result with a single lag column value
pub fn replica_status(column: &str, lag: Value) -> QueryResult {
    QueryResult::from_rows(
        vec!["Slave_IO_State".into(), column.to_string()],
        vec![vec![Value::String("Waiting for source".into()), lag]],
    )
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MystatError::Connection("connection is closed".into()));
        }
        self.statements.lock().unwrap().push(sql.to_string());
        if let Some((fragment, kind)) = self.failure {
            if sql.contains(fragment) {
                return Err(kind.error(fragment));
            }
        }

        if sql.contains("information_schema.processlist") {
            Ok(Self::threads())
        } else if sql.contains("information_schema.innodb_trx") {
            Ok(Self::transactions())
        } else if sql.contains("SLAVE STATUS") || sql.contains("REPLICA STATUS") {
            Ok(self.replica.clone())
        } else if sql.contains("GLOBAL STATUS") {
            let n = self.status_reads.fetch_add(1, Ordering::SeqCst);
            let rows = (self.status)(n)
                .into_iter()
                .map(|(name, value)| vec![Value::String(name), value])
                .collect();
            Ok(QueryResult::from_rows(
                vec!["Variable_name".into(), "Value".into()],
                rows,
            ))
        } else {
            Err(MystatError::Query(format!("unexpected statement: {}", sql)))
        }
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Hands out connections built by `make(attempt)` and counts them
pub struct MockFactory {
    make: Box<dyn Fn(usize) -> Result<MockConnection> + Send + Sync>,
    creates: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl MockFactory {
    pub fn new(make: impl Fn(usize) -> Result<MockConnection> + Send + Sync + 'static) -> Self {
        Self {
            make: Box::new(make),
            creates: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every connection counts up by `step` per status read
    pub fn healthy(step: u64) -> Self {
        Self::new(move |_| Ok(MockConnection::new(counting_status(step))))
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionFactory for MockFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        let attempt = self.creates.fetch_add(1, Ordering::SeqCst);
        let conn = (self.make)(attempt)?.with_close_counter(self.closes.clone());
        Ok(Arc::new(conn))
    }
}

/// Collects written lines for inspection
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
