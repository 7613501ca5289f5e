//! Delta computation module
//!
//! Turns two counter snapshots taken a sampling window apart, plus the
//! per-cycle instantaneous facts, into one immutable [`MetricsRecord`].

mod calculator;
mod facts;
mod record;


pub use calculator::*;
pub use facts::*;
pub use record::*;
