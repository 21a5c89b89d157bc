//! Ledgerbook Core - the household ledger aggregation engine.
//!
//! This crate keeps derived financial state (daily balance snapshots,
//! monthly summaries, budget usage, savings-goal progress) consistent with
//! an append/soft-delete transaction ledger stored in SQLite.

pub mod balances;
pub mod budgets;
pub mod categories;
pub mod db;
pub mod errors;
pub mod goals;
pub mod schema;
pub mod summary;
pub mod transactions;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
