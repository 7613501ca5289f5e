//! mystat core - connection abstractions shared by the monitor and drivers
//!
//! This crate provides:
//!
//! - `Connection` - Trait for read-only database connections
//! - `ConnectionConfig` / `InstanceAddr` - Where and how to connect
//! - `MystatError` - The error taxonomy used across the workspace
//! - Common result types like `Value`, `Row` and `QueryResult`

mod config;
mod connection;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use config::*;
pub use connection::*;
pub use error::*;
pub use types::*;
