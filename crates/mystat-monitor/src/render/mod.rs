//! Table rendering module
//!
//! Fixed-width, pipe-delimited output: a group banner line, a column label
//! line and one data row per [`MetricsRecord`](crate::MetricsRecord).

mod renderer;
mod schema;

#[cfg(test)]
mod tests;

pub use renderer::*;
pub use schema::*;
