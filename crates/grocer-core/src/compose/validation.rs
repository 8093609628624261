//! Parameter checks run before any row is written.

use crate::error::{GrocerError, Result};
use crate::storage::types::{
    IngredientLine, IngredientRef, NewRecipe, NewSchedule, RecipeFields, UpdateRecipe,
};

pub const MAX_NAME_BYTES: usize = 255;

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GrocerError::Validation(format!("{} name is empty", what)));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(GrocerError::Validation(format!(
            "{} name too long (max {} bytes)",
            what, MAX_NAME_BYTES
        )));
    }
    Ok(())
}

fn validate_fields(fields: &RecipeFields) -> Result<()> {
    validate_name("Recipe", &fields.name)?;
    if fields.portion < 1 {
        return Err(GrocerError::Validation(
            "Recipe portion must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_lines(lines: &[IngredientLine]) -> Result<()> {
    for line in lines {
        if let IngredientRef::New(name) = &line.ingredient {
            validate_name("Ingredient", name)?;
        }
        if !line.amount.is_finite() || line.amount < 0.0 {
            return Err(GrocerError::Validation(format!(
                "Invalid ingredient amount: {}",
                line.amount
            )));
        }
    }
    Ok(())
}

pub fn validate_new_recipe(recipe: &NewRecipe) -> Result<()> {
    validate_fields(&recipe.fields)?;
    validate_lines(&recipe.ingredients)
}

pub fn validate_update_recipe(update: &UpdateRecipe) -> Result<()> {
    validate_fields(&update.fields)?;
    validate_lines(&update.ingredients)
}

pub fn validate_new_schedule(schedule: &NewSchedule) -> Result<()> {
    if schedule.recipes.is_empty() {
        return Err(GrocerError::Validation(
            "Schedule needs at least one recipe".to_string(),
        ));
    }
    if let Some(item) = schedule.recipes.iter().find(|item| item.portion < 1) {
        return Err(GrocerError::Validation(format!(
            "Portion for recipe {} must be at least 1",
            item.recipe_id
        )));
    }
    Ok(())
}
