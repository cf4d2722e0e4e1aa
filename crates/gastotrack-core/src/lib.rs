//! GastoTrack Core Library
//!
//! Shared functionality for the GastoTrack expense tracker:
//! - Expense and budget models with field-level validation
//! - SQLite storage layer with connection pooling
//! - Filtered queries and aggregate statistics
//! - Monthly budget progress and alerts

pub mod db;
pub mod error;
pub mod models;
pub mod stats;

pub use db::{Database, ExpenseFilter};
pub use error::{Error, Result};
