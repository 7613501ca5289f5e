//! Names of the tracked global status counters

use serde::{Serialize, Serializer};
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A global status variable tracked by the monitor.
///
/// The set is fixed; every snapshot must carry a value for each variant.
/// String forms are the exact `Variable_name` values reported by the server.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CounterName {
    #[strum(serialize = "Connections")]
    Connections,
    #[strum(serialize = "Bytes_sent")]
    BytesSent,
    #[strum(serialize = "Bytes_received")]
    BytesReceived,
    #[strum(serialize = "Sort_rows")]
    SortRows,
    #[strum(serialize = "Innodb_rows_read")]
    InnodbRowsRead,
    #[strum(serialize = "Innodb_rows_inserted")]
    InnodbRowsInserted,
    #[strum(serialize = "Innodb_rows_updated")]
    InnodbRowsUpdated,
    #[strum(serialize = "Innodb_rows_deleted")]
    InnodbRowsDeleted,
    #[strum(serialize = "Com_select")]
    ComSelect,
    #[strum(serialize = "Com_insert")]
    ComInsert,
    #[strum(serialize = "Com_update")]
    ComUpdate,
    #[strum(serialize = "Com_delete")]
    ComDelete,
    #[strum(serialize = "Com_begin")]
    ComBegin,
    #[strum(serialize = "Com_commit")]
    ComCommit,
    #[strum(serialize = "Com_rollback")]
    ComRollback,
    #[strum(serialize = "Created_tmp_tables")]
    CreatedTmpTables,
    #[strum(serialize = "Created_tmp_disk_tables")]
    CreatedTmpDiskTables,
    #[strum(serialize = "Innodb_buffer_pool_read_requests")]
    InnodbBufferPoolReadRequests,
    #[strum(serialize = "Innodb_buffer_pool_reads")]
    InnodbBufferPoolReads,
    #[strum(serialize = "Innodb_buffer_pool_write_requests")]
    InnodbBufferPoolWriteRequests,
    #[strum(serialize = "Innodb_buffer_pool_pages_dirty")]
    InnodbBufferPoolPagesDirty,
    #[strum(serialize = "Innodb_buffer_pool_pages_flushed")]
    InnodbBufferPoolPagesFlushed,
    #[strum(serialize = "Innodb_buffer_pool_pages_free")]
    InnodbBufferPoolPagesFree,
}

impl CounterName {
    /// The server-side variable name
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Position of this counter in [`CounterName::all`] order
    pub fn index(self) -> usize {
        self as usize
    }

    /// All tracked counters in declaration order
    pub fn all() -> impl Iterator<Item = CounterName> {
        CounterName::iter()
    }

    /// Gauges report a current level rather than a running total, so they
    /// shrink during normal operation. A decrease is clamped like any other
    /// but is not evidence of a server restart.
    pub fn is_gauge(self) -> bool {
        matches!(
            self,
            CounterName::InnodbBufferPoolPagesDirty | CounterName::InnodbBufferPoolPagesFree
        )
    }
}

impl std::fmt::Display for CounterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CounterName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Number of tracked counters
pub const TRACKED_COUNTERS: usize = CounterName::COUNT;
