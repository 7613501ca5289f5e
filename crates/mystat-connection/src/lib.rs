//! mystat connection management
//!
//! Opening (and re-opening) monitoring sessions with bounded retries.

pub mod reconnect;

pub use reconnect::{BackoffStrategy, ConnectionFactory, ReconnectConfig, connect_with_retry};
