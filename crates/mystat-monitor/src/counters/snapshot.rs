//! Point-in-time counter snapshots

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mystat_core::{MystatError, Result};
use serde::Serialize;

use super::CounterName;

/// A tracked counter whose reported value was not a non-negative integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedValue {
    pub name: CounterName,
    pub raw: String,
}

/// Values of the tracked counters as read at one instant.
///
/// A snapshot is immutable once built. Values the server reported in an
/// unusable form are kept aside in [`CounterSnapshot::rejected`] instead of
/// being coerced, so [`CounterSnapshot::validate`] can name them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSnapshot {
    values: BTreeMap<CounterName, u64>,
    rejected: Vec<RejectedValue>,
    captured_at: DateTime<Utc>,
}

impl CounterSnapshot {
    /// Build a snapshot from already-typed values
    pub fn from_values(
        values: impl IntoIterator<Item = (CounterName, u64)>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            values: values.into_iter().collect(),
            rejected: Vec::new(),
            captured_at,
        }
    }

    /// Parse raw `(Variable_name, Value)` pairs as returned by the server.
    ///
    /// Names outside the tracked set are ignored. Tracked names whose value
    /// does not parse as `u64` are recorded as rejected.
    pub fn parse<N, V>(raw: impl IntoIterator<Item = (N, V)>, captured_at: DateTime<Utc>) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        let mut rejected = Vec::new();

        for (name, value) in raw {
            let (name, value) = (name.as_ref(), value.as_ref());
            let Ok(counter) = CounterName::from_str(name) else {
                tracing::debug!(name, "ignoring untracked status variable");
                continue;
            };
            match value.trim().parse::<u64>() {
                Ok(v) => {
                    values.insert(counter, v);
                }
                Err(_) => rejected.push(RejectedValue {
                    name: counter,
                    raw: value.to_string(),
                }),
            }
        }

        Self {
            values,
            rejected,
            captured_at,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn get(&self, name: CounterName) -> Option<u64> {
        self.values.get(&name).copied()
    }

    /// Value of `name`, or a data integrity error if it is absent
    pub fn require(&self, name: CounterName) -> Result<u64> {
        self.get(name).ok_or_else(|| {
            MystatError::DataIntegrity(format!("counter {} missing from snapshot", name))
        })
    }

    pub fn rejected(&self) -> &[RejectedValue] {
        &self.rejected
    }

    /// Tracked counters with no usable value, in declaration order
    pub fn missing(&self) -> Vec<CounterName> {
        CounterName::all()
            .filter(|name| !self.values.contains_key(name))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == super::TRACKED_COUNTERS
    }

    /// Check that every tracked counter has a usable value
    pub fn validate(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }

        let mut problems = Vec::new();
        let missing: Vec<_> = self
            .missing()
            .into_iter()
            .filter(|name| !self.rejected.iter().any(|r| r.name == *name))
            .map(CounterName::as_str)
            .collect();
        if !missing.is_empty() {
            problems.push(format!("missing counters: {}", missing.join(", ")));
        }
        if !self.rejected.is_empty() {
            let rejected: Vec<_> = self
                .rejected
                .iter()
                .map(|r| format!("{}={:?}", r.name, r.raw))
                .collect();
            problems.push(format!("non-numeric counters: {}", rejected.join(", ")));
        }

        Err(MystatError::DataIntegrity(problems.join("; ")))
    }
}
