//! Column schemas for the output table

use serde::Serialize;

use crate::delta::{MetricsRecord, ReplicaLag};

/// Rendered in place of an unmeasurable replication lag
pub const LAG_UNKNOWN_SENTINEL: u64 = 99999;

/// Local time format of the first column
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value that can be shown in a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Time,
    TotalThreads,
    ActiveThreads,
    WaitingThreads,
    NewConnections,
    TotalTrx,
    WaitingTrx,
    TrxMaxSec,
    Selects,
    Inserts,
    Updates,
    Deletes,
    Begins,
    Commits,
    Rollbacks,
    TempTables,
    TempDiskTables,
    SortedRows,
    ReadRows,
    InsertedRows,
    UpdatedRows,
    DeletedRows,
    BytesSentMb,
    BytesReceivedMb,
    ReplicaLag,
    BufferPoolReadMb,
    BufferPoolPhysicalReadMb,
    BufferPoolWriteMb,
    BufferPoolDirtyMb,
    BufferPoolFlushedMb,
    BufferPoolFreeMb,
}

/// Rendered lag: 0 when not a replica, the sentinel when unknown
pub fn rendered_lag(lag: ReplicaLag) -> u64 {
    match lag {
        ReplicaLag::NotReplica => 0,
        ReplicaLag::Seconds(s) => s,
        ReplicaLag::Unknown => LAG_UNKNOWN_SENTINEL,
    }
}

impl Field {
    /// Text of this field for `record`, before padding
    pub fn format(self, record: &MetricsRecord) -> String {
        let facts = record.facts();
        let rates = record.rates();
        let value = match self {
            Field::Time => return record.timestamp().format(TIME_FORMAT).to_string(),
            Field::TotalThreads => facts.total_threads,
            Field::ActiveThreads => facts.active_threads,
            Field::WaitingThreads => facts.waiting_threads,
            Field::NewConnections => rates.new_connections,
            Field::TotalTrx => facts.total_trx,
            Field::WaitingTrx => facts.waiting_trx,
            Field::TrxMaxSec => facts.trx_max_age_secs,
            Field::Selects => rates.selects,
            Field::Inserts => rates.inserts,
            Field::Updates => rates.updates,
            Field::Deletes => rates.deletes,
            Field::Begins => rates.begins,
            Field::Commits => rates.commits,
            Field::Rollbacks => rates.rollbacks,
            Field::TempTables => rates.temp_tables_created,
            Field::TempDiskTables => rates.temp_tables_on_disk,
            Field::SortedRows => rates.sorted_rows,
            Field::ReadRows => rates.read_rows,
            Field::InsertedRows => rates.inserted_rows,
            Field::UpdatedRows => rates.updated_rows,
            Field::DeletedRows => rates.deleted_rows,
            Field::BytesSentMb => rates.bytes_sent_mb,
            Field::BytesReceivedMb => rates.bytes_received_mb,
            Field::ReplicaLag => rendered_lag(facts.replica_lag),
            Field::BufferPoolReadMb => rates.buffer_pool_logical_read_mb,
            Field::BufferPoolPhysicalReadMb => rates.buffer_pool_physical_read_mb,
            Field::BufferPoolWriteMb => rates.buffer_pool_write_mb,
            Field::BufferPoolDirtyMb => rates.buffer_pool_dirty_mb,
            Field::BufferPoolFlushedMb => rates.buffer_pool_flushed_mb,
            Field::BufferPoolFreeMb => rates.buffer_pool_free_mb,
        };
        value.to_string()
    }
}

/// Alignment of a column label. Values are always right-justified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Right,
    /// Centered, with the odd space on the left
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub field: Field,
    pub label: &'static str,
    pub width: usize,
    pub label_align: Align,
}

impl Column {
    pub const fn new(field: Field, label: &'static str, width: usize) -> Self {
        Self {
            field,
            label,
            width,
            label_align: Align::Right,
        }
    }

    pub const fn centered(mut self) -> Self {
        self.label_align = Align::Center;
        self
    }
}

/// Columns sharing one banner title. An empty title renders as blanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub title: &'static str,
    pub columns: &'static [Column],
    /// Dashes before the title; `None` centers it with the odd dash on the left
    pub banner_lead: Option<usize>,
}

impl ColumnGroup {
    /// Width of the group including the separators between its columns
    pub fn width(&self) -> usize {
        let inner: usize = self.columns.iter().map(|c| c.width).sum();
        inner + self.columns.len().saturating_sub(1)
    }
}

const TIME: ColumnGroup = ColumnGroup {
    title: "",
    banner_lead: None,
    columns: &[Column::new(Field::Time, "time", 19).centered()],
};

const THREAD_INFO: ColumnGroup = ColumnGroup {
    title: "THREAD INFO",
    banner_lead: None,
    columns: &[
        Column::new(Field::TotalThreads, "total", 9),
        Column::new(Field::ActiveThreads, "active", 6),
        Column::new(Field::WaitingThreads, "wait", 6),
        Column::new(Field::NewConnections, "create", 6),
    ],
};

const TRX_INFO: ColumnGroup = ColumnGroup {
    title: "TRX INFO",
    banner_lead: None,
    columns: &[
        Column::new(Field::TotalTrx, "total", 6),
        Column::new(Field::WaitingTrx, "wait", 6),
        Column::new(Field::TrxMaxSec, "MaxSec", 8),
    ],
};

const CMD_INFO: ColumnGroup = ColumnGroup {
    title: "CMD INFO",
    banner_lead: None,
    columns: &[
        Column::new(Field::Selects, "select", 8),
        Column::new(Field::Inserts, "insert", 8),
        Column::new(Field::Updates, "update", 8),
        Column::new(Field::Deletes, "delete", 8),
        Column::new(Field::Begins, "begin", 8),
        Column::new(Field::Commits, "commit", 8),
        Column::new(Field::Rollbacks, "rollback", 8),
    ],
};

const TMP_INFO: ColumnGroup = ColumnGroup {
    title: "TMP INFO",
    banner_lead: None,
    columns: &[
        Column::new(Field::TempTables, "mem", 6),
        Column::new(Field::TempDiskTables, "disk", 6),
    ],
};

const ROWS_INFO: ColumnGroup = ColumnGroup {
    title: "ROWS INFO",
    banner_lead: Some(23),
    columns: &[
        Column::new(Field::SortedRows, "sort", 10),
        Column::new(Field::ReadRows, "read", 10),
        Column::new(Field::InsertedRows, "insert", 10),
        Column::new(Field::UpdatedRows, "update", 10),
        Column::new(Field::DeletedRows, "delete", 10),
    ],
};

const NETWORK_INFO: ColumnGroup = ColumnGroup {
    title: "NETWORK INFO",
    banner_lead: Some(1),
    columns: &[
        Column::new(Field::BytesSentMb, "outMB", 8),
        Column::new(Field::BytesReceivedMb, "inMB", 8),
    ],
};

const REPL_INFO: ColumnGroup = ColumnGroup {
    title: "REPL",
    banner_lead: None,
    columns: &[Column::new(Field::ReplicaLag, "lagSec", 8)],
};

const BUFFER_POOL_INFO: ColumnGroup = ColumnGroup {
    title: "BUFFER POOL INFO",
    banner_lead: None,
    columns: &[
        Column::new(Field::BufferPoolReadMb, "readMB", 8),
        Column::new(Field::BufferPoolPhysicalReadMb, "phyRdMB", 8),
        Column::new(Field::BufferPoolWriteMb, "writeMB", 8),
        Column::new(Field::BufferPoolDirtyMb, "dirtyMB", 8),
        Column::new(Field::BufferPoolFlushedMb, "flushMB", 8),
        Column::new(Field::BufferPoolFreeMb, "freeMB", 8),
    ],
};

static CANONICAL_GROUPS: &[ColumnGroup] = &[
    TIME,
    THREAD_INFO,
    TRX_INFO,
    CMD_INFO,
    TMP_INFO,
    ROWS_INFO,
    NETWORK_INFO,
];

static EXTENDED_GROUPS: &[ColumnGroup] = &[
    TIME,
    THREAD_INFO,
    TRX_INFO,
    CMD_INFO,
    TMP_INFO,
    ROWS_INFO,
    NETWORK_INFO,
    REPL_INFO,
    BUFFER_POOL_INFO,
];

/// An ordered, immutable set of column groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    groups: &'static [ColumnGroup],
}

impl TableSchema {
    /// The classic 24-column layout
    pub const fn canonical() -> Self {
        Self {
            groups: CANONICAL_GROUPS,
        }
    }

    /// Canonical columns plus replication lag and buffer pool traffic
    pub const fn extended() -> Self {
        Self {
            groups: EXTENDED_GROUPS,
        }
    }

    pub fn groups(&self) -> &'static [ColumnGroup] {
        self.groups
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static Column> {
        self.groups.iter().flat_map(|g| g.columns.iter())
    }

    pub fn column_count(&self) -> usize {
        self.columns().count()
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::canonical()
    }
}
