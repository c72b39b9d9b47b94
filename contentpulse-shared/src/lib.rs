//! # ContentPulse Shared Library
//!
//! Domain logic for ContentPulse, used by the API server and by tests.
//!
//! ## Module Organization
//!
//! - `db`: connection pool, embedded schema migrations, default catalog seed
//! - `models`: tenant-scoped repository, one module per table
//! - `auth`: password policy and hashing, session tokens, membership checks
//! - `context`: the request-scoped tenant context
//! - `editorial`: grid coercion, reconciliation, suggestion ingestion, drafting
//! - `generation`: the text-generation collaborator
//! - `error`: the error taxonomy shared by every operation

pub mod auth;
pub mod context;
pub mod db;
pub mod editorial;
pub mod error;
pub mod generation;
pub mod models;

/// Current version of the ContentPulse shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
