//! Storage abstractions and the SQLite backend.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{Queries, SqliteStore, StoreOptions};
pub use traits::{GroceryStore, Querier};
pub use types::{
    Grocery, Ingredient, IngredientLine, IngredientRef, NewIngredient, NewRecipe, NewSchedule,
    Recipe, RecipeComposition, RecipeFields, RecipeIngredient, RecipeIngredientRow, RecipePortion,
    Schedule, ScheduleComposition, ScheduleRecipe, ScheduleRecipeRow, Unit, UpdateRecipe, User,
};
