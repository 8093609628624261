//! Aggregate operations written against the [`Querier`] capability set.
//!
//! [`Querier`]: crate::storage::Querier

mod grocery;
mod recipe;
mod resolve;
pub mod validation;

pub use grocery::{delete_schedule, generate_groceries, load_schedule, remove_recipe};
pub use recipe::{create_recipe, delete_recipe, load_recipe, remove_ingredient, update_recipe};
pub use resolve::{resolve_ingredient, resolve_line};
