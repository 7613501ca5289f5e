//! Reconnect functionality for monitoring sessions
//!
//! The sampler drops and re-opens its connection at every epoch boundary.
//! This module decides how often a failed open is retried and how long to
//! wait between attempts.
//!
//! # Example
//!
//! ```ignore
//! use mystat_connection::reconnect::{BackoffStrategy, ReconnectConfig, connect_with_retry};
//!
//! let config = ReconnectConfig::new(3, BackoffStrategy::new(500, 30_000));
//! let conn = connect_with_retry(&factory, &config).await?;
//! ```

mod backoff;
mod factory;


pub use backoff::BackoffStrategy;
pub use factory::{ConnectionFactory, ReconnectConfig, connect_with_retry};
