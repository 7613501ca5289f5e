//! Core types for mystat

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A database value as returned by a read-only query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit unsigned integer (counters above `i64::MAX`)
    UInt64(u64),
    /// 64-bit floating point
    Float64(f64),
    /// Decimal/Numeric (stored as string for precision)
    Decimal(String),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Date (year, month, day)
    Date(NaiveDate),
    /// DateTime without timezone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a non-negative integer.
    ///
    /// Aggregates such as `SUM(...)` come back as DECIMAL, so whole floats
    /// and decimal strings with a zero fraction are accepted too.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int64(v) => u64::try_from(*v).ok(),
            Value::UInt64(v) => Some(*v),
            Value::Float64(f) if *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64 => {
                Some(*f as u64)
            }
            Value::String(s) | Value::Decimal(s) => {
                let s = s.trim();
                let whole = match s.split_once('.') {
                    Some((whole, frac)) if frac.bytes().all(|b| b == b'0') => whole,
                    Some(_) => return None,
                    None => s,
                };
                whole.parse::<u64>().ok()
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v),
        }
    }
}

/// A row from a query result
#[derive(Debug, Clone)]
pub struct Row {
    /// Column values
    pub values: Vec<Value>,
    /// Column names
    columns: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { values, columns }
    }

    /// Get a value by column name.
    ///
    /// Falls back to a case-insensitive match: `SHOW` statements and
    /// `information_schema` disagree on the case of column labels across
    /// server versions.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
            .and_then(|idx| self.values.get(idx))
    }

    /// Get column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Query result
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Build a result from column names and row values
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        Self {
            columns,
            rows,
            execution_time_ms: 0,
        }
    }

    /// The first row, if any
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
