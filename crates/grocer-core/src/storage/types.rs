//! Core data types for the storage layer.
//!
//! Row types mirror the tables one to one. `*Row` types are joined read
//! shapes, and `New*`/`Update*` types are the parameter structs callers hand
//! to the aggregate operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GrocerError, Result};

/// A registered user. Only referenced as a recipe/schedule author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A unit of measure (e.g. "gram", "cup").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
}

/// An ingredient. Names are unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub default_unit: Option<i64>,
}

/// Builder for creating new ingredients.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub default_unit: Option<i64>,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_unit: None,
        }
    }

    pub fn with_default_unit(mut self, unit_id: i64) -> Self {
        self.default_unit = Some(unit_id);
        self
    }
}

/// A recipe header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub author: Uuid,
    pub portion: i32,
    pub steps: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Editable recipe header fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    pub portion: i32,
    pub steps: Option<String>,
}

impl RecipeFields {
    pub fn new(name: impl Into<String>, portion: i32) -> Self {
        Self {
            name: name.into(),
            portion,
            steps: None,
        }
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = Some(steps.into());
        self
    }
}

/// Junction row: "this recipe uses this much of this ingredient in this unit".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: f64,
    pub unit_id: i64,
}

/// Junction row joined with ingredient and unit names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub amount: f64,
    pub unit_id: i64,
    pub unit_name: String,
}

/// How an ingredient line refers to its ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientRef {
    /// An ingredient that already exists, by id.
    Existing(i64),
    /// An ingredient by name, created if it does not exist yet.
    New(String),
}

/// One ingredient line of a recipe being created or updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient: IngredientRef,
    pub amount: f64,
    pub unit_id: i64,
}

impl IngredientLine {
    pub fn existing(ingredient_id: i64, amount: f64, unit_id: i64) -> Self {
        Self {
            ingredient: IngredientRef::Existing(ingredient_id),
            amount,
            unit_id,
        }
    }

    pub fn named(name: impl Into<String>, amount: f64, unit_id: i64) -> Self {
        Self {
            ingredient: IngredientRef::New(name.into()),
            amount,
            unit_id,
        }
    }

    /// Build a line from the loose `{id?, name?}` request shape.
    ///
    /// An id wins when both are present.
    pub fn from_parts(
        id: Option<i64>,
        name: Option<&str>,
        amount: f64,
        unit_id: i64,
    ) -> Result<Self> {
        match (id, name.map(str::trim)) {
            (Some(id), _) => Ok(Self::existing(id, amount, unit_id)),
            (None, Some(name)) if !name.is_empty() => Ok(Self::named(name, amount, unit_id)),
            _ => Err(GrocerError::Validation(
                "Ingredient line needs an ingredient id or a name".to_string(),
            )),
        }
    }
}

/// Parameters for creating a recipe together with its ingredients.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub author: Uuid,
    pub fields: RecipeFields,
    pub ingredients: Vec<IngredientLine>,
}

impl NewRecipe {
    pub fn new(author: Uuid, fields: RecipeFields) -> Self {
        Self {
            author,
            fields,
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, line: IngredientLine) -> Self {
        self.ingredients.push(line);
        self
    }

    pub fn with_ingredients(mut self, lines: Vec<IngredientLine>) -> Self {
        self.ingredients = lines;
        self
    }
}

/// Parameters for updating a recipe and merging ingredient lines into it.
#[derive(Debug, Clone)]
pub struct UpdateRecipe {
    pub id: i64,
    pub fields: RecipeFields,
    pub ingredients: Vec<IngredientLine>,
}

impl UpdateRecipe {
    pub fn new(id: i64, fields: RecipeFields) -> Self {
        Self {
            id,
            fields,
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, line: IngredientLine) -> Self {
        self.ingredients.push(line);
        self
    }

    pub fn with_ingredients(mut self, lines: Vec<IngredientLine>) -> Self {
        self.ingredients = lines;
        self
    }
}

/// A recipe together with its resolved ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeComposition {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientRow>,
}

/// A group of recipes meant to be cooked together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub author: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Junction row: "cook this recipe, scaled to this many portions".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecipe {
    pub schedule_id: i64,
    pub recipe_id: i64,
    pub portion: i32,
}

/// Schedule junction row joined with the recipe name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecipeRow {
    pub schedule_id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub portion: i32,
}

/// One entry of a derived grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grocery {
    pub ingredient_id: i64,
    pub name: String,
}

/// A recipe and the number of portions to cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePortion {
    pub recipe_id: i64,
    pub portion: i32,
}

/// Parameters for creating a schedule and deriving its grocery list.
#[derive(Debug, Clone, Default)]
pub struct NewSchedule {
    pub author: Option<Uuid>,
    pub recipes: Vec<RecipePortion>,
}

impl NewSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: Uuid) -> Self {
        self.author = Some(author);
        self
    }

    pub fn recipe(mut self, recipe_id: i64, portion: i32) -> Self {
        self.recipes.push(RecipePortion { recipe_id, portion });
        self
    }
}

/// A schedule with its recipe rows and deduplicated grocery list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleComposition {
    pub schedule: Schedule,
    pub recipes: Vec<ScheduleRecipeRow>,
    pub groceries: Vec<Grocery>,
}
