//! Storage trait definitions.
//!
//! [`Querier`] is the single-table capability set the aggregate operations
//! are written against. [`GroceryStore`] is the public surface: every method
//! runs as exactly one unit of work.

use uuid::Uuid;

use super::types::{
    Grocery, Ingredient, NewIngredient, NewRecipe, NewSchedule, Recipe, RecipeComposition,
    RecipeFields, RecipeIngredient, RecipeIngredientRow, Schedule, ScheduleComposition,
    ScheduleRecipe, ScheduleRecipeRow, UpdateRecipe, Unit, User,
};
use crate::error::Result;

/// Aggregate-write operations over recipes and schedules.
///
/// Implementations must ensure:
/// - Each call opens exactly one transaction
/// - A failed call leaves no rows behind
/// - Returned ingredient and grocery lists are re-read after the writes
pub trait GroceryStore: Send + Sync {
    /// Create a recipe row and one junction row per ingredient line.
    ///
    /// Lines naming a new ingredient are resolved with get-or-create
    /// semantics, so two concurrent callers converge on one ingredient row.
    ///
    /// # Errors
    ///
    /// - `GrocerError::Validation` if the parameters are malformed
    /// - `GrocerError::NotFound` if a referenced author, unit or ingredient is missing
    /// - `GrocerError::Conflict` if the same ingredient appears twice
    fn create_recipe_with_ingredients(&self, recipe: &NewRecipe) -> Result<RecipeComposition>;

    /// Load a recipe and its ingredient list from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the recipe does not exist.
    fn load_recipe_composition(&self, recipe_id: i64) -> Result<RecipeComposition>;

    /// Update recipe header fields and merge ingredient lines into the recipe.
    ///
    /// Lines with an existing ingredient id overwrite that junction row's
    /// amount and unit. Lines with a name add a new junction row. Rows not
    /// mentioned are left alone; use [`GroceryStore::remove_recipe_ingredient`]
    /// to drop one.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the recipe, or the junction row of an
    /// id line, does not exist.
    fn update_recipe_composition(&self, update: &UpdateRecipe) -> Result<RecipeComposition>;

    /// Remove a single ingredient from a recipe.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the recipe does not use the ingredient.
    fn remove_recipe_ingredient(&self, recipe_id: i64, ingredient_id: i64) -> Result<()>;

    /// Create a schedule, attach its recipes and derive the grocery list.
    ///
    /// The grocery list holds each ingredient once, however many recipes use it.
    fn generate_grocery_list(&self, schedule: &NewSchedule) -> Result<ScheduleComposition>;

    /// Re-derive the composition of an existing schedule.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the schedule does not exist.
    fn load_schedule_composition(&self, schedule_id: i64) -> Result<ScheduleComposition>;

    /// All recipes, ordered by name.
    fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Delete a recipe. Its ingredient and schedule junction rows go with
    /// it; the ingredients themselves are kept.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the recipe does not exist.
    fn delete_recipe(&self, recipe_id: i64) -> Result<()>;

    /// All schedules, newest first.
    fn list_schedules(&self) -> Result<Vec<Schedule>>;

    /// Delete a schedule and its recipe rows. Recipes are kept.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the schedule does not exist.
    fn delete_schedule(&self, schedule_id: i64) -> Result<()>;

    /// Drop one recipe from a schedule.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::NotFound` if the schedule does not list the recipe.
    fn remove_schedule_recipe(&self, schedule_id: i64, recipe_id: i64) -> Result<()>;

    /// Check store integrity (foreign keys, ingredient name uniqueness).
    fn check_integrity(&self) -> Result<()>;
}

/// Single-row and single-table queries, scoped to one connection or
/// transaction.
pub trait Querier {
    // --- Users ---

    fn create_user(&self, username: &str) -> Result<User>;

    fn get_user(&self, id: &Uuid) -> Result<Option<User>>;

    // --- Units ---

    fn create_unit(&self, name: &str) -> Result<Unit>;

    fn get_unit(&self, id: i64) -> Result<Option<Unit>>;

    fn list_units(&self) -> Result<Vec<Unit>>;

    // --- Ingredients ---

    /// Insert an ingredient unless one with the same name exists.
    ///
    /// Returns `Ok(None)` when the name is already taken. Other failures
    /// (e.g. an unknown default unit) are errors.
    fn try_create_ingredient(&self, ingredient: &NewIngredient) -> Result<Option<Ingredient>>;

    fn get_ingredient(&self, id: i64) -> Result<Option<Ingredient>>;

    /// Exact-name lookup.
    fn find_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>>;

    /// Case-insensitive substring search, ordered by name.
    fn search_ingredients(&self, fragment: &str) -> Result<Vec<Ingredient>>;

    // --- Recipes ---

    fn create_recipe(&self, author: &Uuid, fields: &RecipeFields) -> Result<Recipe>;

    fn get_recipe(&self, id: i64) -> Result<Option<Recipe>>;

    /// Overwrite header fields and bump `modified_at`.
    ///
    /// Returns `Ok(None)` if the recipe does not exist.
    fn update_recipe(&self, id: i64, fields: &RecipeFields) -> Result<Option<Recipe>>;

    fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Returns `false` if no recipe matched.
    fn delete_recipe(&self, id: i64) -> Result<bool>;

    // --- Recipe ingredients ---

    fn create_recipe_ingredient(&self, row: &RecipeIngredient) -> Result<RecipeIngredient>;

    /// Returns `Ok(None)` if no junction row matches.
    fn update_recipe_ingredient(&self, row: &RecipeIngredient) -> Result<Option<RecipeIngredient>>;

    /// Returns `false` if no junction row matched.
    fn delete_recipe_ingredient(&self, recipe_id: i64, ingredient_id: i64) -> Result<bool>;

    /// Junction rows for a recipe joined with ingredient and unit names.
    fn list_recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<RecipeIngredientRow>>;

    // --- Schedules ---

    fn create_schedule(&self, author: Option<&Uuid>) -> Result<Schedule>;

    fn get_schedule(&self, id: i64) -> Result<Option<Schedule>>;

    fn list_schedules(&self) -> Result<Vec<Schedule>>;

    /// Returns `false` if no schedule matched.
    fn delete_schedule(&self, id: i64) -> Result<bool>;

    fn create_schedule_recipe(&self, row: &ScheduleRecipe) -> Result<ScheduleRecipe>;

    /// Returns `false` if no junction row matched.
    fn delete_schedule_recipe(&self, schedule_id: i64, recipe_id: i64) -> Result<bool>;

    /// Schedule junction rows joined with recipe names.
    fn list_schedule_recipes(&self, schedule_id: i64) -> Result<Vec<ScheduleRecipeRow>>;

    /// Distinct ingredients used by any recipe of the schedule, by name.
    fn list_groceries(&self, schedule_id: i64) -> Result<Vec<Grocery>>;
}
