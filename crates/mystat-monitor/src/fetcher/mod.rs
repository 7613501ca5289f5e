//! Snapshot fetcher module
//!
//! Runs the read-only queries for one cycle and parses their results into
//! [`InstantaneousFacts`](crate::InstantaneousFacts) and
//! [`CounterSnapshot`](crate::CounterSnapshot)s.

mod parse;
mod queries;
mod snapshot_fetcher;


pub use parse::*;
pub use queries::*;
pub use snapshot_fetcher::*;
