//! Database layer: connection pool, schema bootstrap, and the default catalog
//! seed applied when a company is created.
//!
//! Models live in [`crate::models`].

pub mod migrations;
pub mod pool;
pub mod seed;
