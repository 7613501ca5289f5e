//! Values read once per cycle rather than derived from deltas

use serde::{Deserialize, Serialize};

/// Replication lag as observed through the replica status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "seconds")]
pub enum ReplicaLag {
    /// The server reported no replica status at all
    #[default]
    NotReplica,
    /// Measured lag behind the source
    Seconds(u64),
    /// The server is a replica but the lag is NULL (e.g. the SQL thread is stopped)
    Unknown,
}

impl ReplicaLag {
    pub fn seconds(self) -> Option<u64> {
        match self {
            ReplicaLag::Seconds(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_replica(self) -> bool {
        !matches!(self, ReplicaLag::NotReplica)
    }

    /// Combine the lag of several replication channels: any unknown channel
    /// makes the whole unknown, otherwise the worst lag wins.
    pub fn worst(self, other: ReplicaLag) -> ReplicaLag {
        match (self, other) {
            (ReplicaLag::Unknown, _) | (_, ReplicaLag::Unknown) => ReplicaLag::Unknown,
            (ReplicaLag::Seconds(a), ReplicaLag::Seconds(b)) => ReplicaLag::Seconds(a.max(b)),
            (ReplicaLag::Seconds(s), ReplicaLag::NotReplica)
            | (ReplicaLag::NotReplica, ReplicaLag::Seconds(s)) => ReplicaLag::Seconds(s),
            (ReplicaLag::NotReplica, ReplicaLag::NotReplica) => ReplicaLag::NotReplica,
        }
    }
}

/// Thread, transaction and replication state at the start of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstantaneousFacts {
    pub total_threads: u64,
    pub active_threads: u64,
    pub waiting_threads: u64,
    pub total_trx: u64,
    pub waiting_trx: u64,
    /// Age of the oldest open transaction, 0 when none are open
    pub trx_max_age_secs: u64,
    pub replica_lag: ReplicaLag,
}

impl InstantaneousFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(mut self, total: u64, active: u64, waiting: u64) -> Self {
        self.total_threads = total;
        self.active_threads = active;
        self.waiting_threads = waiting;
        self
    }

    pub fn with_transactions(mut self, total: u64, waiting: u64, max_age_secs: u64) -> Self {
        self.total_trx = total;
        self.waiting_trx = waiting;
        self.trx_max_age_secs = max_age_secs;
        self
    }

    pub fn with_replica_lag(mut self, lag: ReplicaLag) -> Self {
        self.replica_lag = lag;
        self
    }
}
