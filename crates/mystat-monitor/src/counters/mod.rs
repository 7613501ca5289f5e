//! Counter snapshot module
//!
//! The fixed set of global status counters the monitor tracks and the
//! point-in-time snapshots built from them.

mod names;
mod snapshot;

#[cfg(test)]
mod tests;

pub use names::*;
pub use snapshot::*;
