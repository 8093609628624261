//! # Grocer Core
//!
//! Core library for Grocer - a grocery planner built around recipes, meal
//! schedules and the shopping lists derived from them.
//!
//! This crate owns the transactional aggregate writes: operations that touch
//! several related tables and must land as one unit of work.
//!
//! ## Architecture
//!
//! - **storage**: `Querier` capability set, `GroceryStore` trait and the SQLite backend
//! - **compose**: recipe composition (create/load/update) and grocery aggregation
//! - **error**: error type shared by both

pub mod compose;
pub mod error;
pub mod storage;

pub use error::{ErrorKind, GrocerError, Result};
pub use storage::{GroceryStore, Querier, SqliteStore, StoreOptions};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
