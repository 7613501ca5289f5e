//! mystat monitor - sampling MySQL performance counters
//!
//! This crate provides the sampling pipeline:
//! - Counter snapshots of `SHOW GLOBAL STATUS`
//! - Delta computation between two snapshots
//! - Fixed-width table rendering
//! - The sampling loop with periodic reconnects

pub mod counters;
pub mod delta;
pub mod fetcher;
pub mod render;
pub mod sampler;

#[cfg(test)]
pub(crate) mod testing;

pub use counters::*;
pub use delta::*;
pub use fetcher::*;
pub use render::*;
pub use sampler::*;
