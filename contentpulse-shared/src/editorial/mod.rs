//! The editorial core: grid coercion, reconciliation, suggestion ingestion and
//! article drafting.

pub mod coerce;
pub mod grid;
pub mod ingest;
pub mod prompt;
pub mod reconcile;
pub mod service;

pub use grid::{GridRow, WorkingRow};
pub use reconcile::{ReconcileOutcome, ReconcilePlan};
pub use service::SuggestionOutcome;
