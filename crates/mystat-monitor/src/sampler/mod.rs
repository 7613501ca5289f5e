//! Sampling loop module
//!
//! Drives connect epochs, per-cycle sampling and output, and stops on a
//! row bound, a fatal error or an external shutdown signal.

mod clock;
mod config;
mod runner;
mod sink;


pub use clock::*;
pub use config::*;
pub use runner::*;
pub use sink::*;
