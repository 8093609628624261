//! Recipe composition: a recipe row plus its ingredient junction rows.
//!
//! These functions run inside a unit of work opened by the caller; any error
//! they return rolls the whole composition back.

use tracing::debug;

use crate::error::{GrocerError, Result};
use crate::storage::traits::Querier;
use crate::storage::types::{
    IngredientRef, NewRecipe, RecipeComposition, RecipeIngredient, UpdateRecipe,
};

use super::resolve::{resolve_ingredient, resolve_line};
use super::validation::{validate_new_recipe, validate_update_recipe};

fn attach_ingredient<Q: Querier + ?Sized>(q: &Q, row: RecipeIngredient) -> Result<()> {
    q.create_recipe_ingredient(&row).map_err(|err| match err {
        GrocerError::Conflict(_) => GrocerError::Conflict(format!(
            "Ingredient {} is already part of recipe {}",
            row.ingredient_id, row.recipe_id
        )),
        other => other,
    })?;
    Ok(())
}

/// Insert a recipe and one junction row per line, then re-read the list.
pub fn create_recipe<Q: Querier + ?Sized>(q: &Q, params: &NewRecipe) -> Result<RecipeComposition> {
    validate_new_recipe(params)?;

    let recipe = q.create_recipe(&params.author, &params.fields)?;
    debug!(recipe_id = recipe.id, lines = params.ingredients.len(), "created recipe");

    for line in &params.ingredients {
        let ingredient_id = resolve_line(q, line)?;
        attach_ingredient(
            q,
            RecipeIngredient {
                recipe_id: recipe.id,
                ingredient_id,
                amount: line.amount,
                unit_id: line.unit_id,
            },
        )?;
    }

    let ingredients = q.list_recipe_ingredients(recipe.id)?;
    Ok(RecipeComposition {
        recipe,
        ingredients,
    })
}

pub fn load_recipe<Q: Querier + ?Sized>(q: &Q, recipe_id: i64) -> Result<RecipeComposition> {
    let recipe = q
        .get_recipe(recipe_id)?
        .ok_or_else(|| GrocerError::NotFound(format!("Recipe {} not found", recipe_id)))?;
    let ingredients = q.list_recipe_ingredients(recipe_id)?;
    Ok(RecipeComposition {
        recipe,
        ingredients,
    })
}

/// Overwrite header fields and merge lines. Never deletes junction rows.
pub fn update_recipe<Q: Querier + ?Sized>(
    q: &Q,
    params: &UpdateRecipe,
) -> Result<RecipeComposition> {
    validate_update_recipe(params)?;

    let recipe = q
        .update_recipe(params.id, &params.fields)?
        .ok_or_else(|| GrocerError::NotFound(format!("Recipe {} not found", params.id)))?;

    for line in &params.ingredients {
        match &line.ingredient {
            IngredientRef::Existing(ingredient_id) => {
                let row = RecipeIngredient {
                    recipe_id: recipe.id,
                    ingredient_id: *ingredient_id,
                    amount: line.amount,
                    unit_id: line.unit_id,
                };
                q.update_recipe_ingredient(&row)?.ok_or_else(|| {
                    GrocerError::NotFound(format!(
                        "Recipe {} has no ingredient {}",
                        recipe.id, ingredient_id
                    ))
                })?;
            }
            IngredientRef::New(name) => {
                let ingredient = resolve_ingredient(q, name, line.unit_id)?;
                attach_ingredient(
                    q,
                    RecipeIngredient {
                        recipe_id: recipe.id,
                        ingredient_id: ingredient.id,
                        amount: line.amount,
                        unit_id: line.unit_id,
                    },
                )?;
            }
        }
    }
    debug!(recipe_id = recipe.id, lines = params.ingredients.len(), "updated recipe");

    let ingredients = q.list_recipe_ingredients(recipe.id)?;
    Ok(RecipeComposition {
        recipe,
        ingredients,
    })
}

pub fn remove_ingredient<Q: Querier + ?Sized>(
    q: &Q,
    recipe_id: i64,
    ingredient_id: i64,
) -> Result<()> {
    if !q.delete_recipe_ingredient(recipe_id, ingredient_id)? {
        return Err(GrocerError::NotFound(format!(
            "Recipe {} has no ingredient {}",
            recipe_id, ingredient_id
        )));
    }
    Ok(())
}

pub fn delete_recipe<Q: Querier + ?Sized>(q: &Q, recipe_id: i64) -> Result<()> {
    if !q.delete_recipe(recipe_id)? {
        return Err(GrocerError::NotFound(format!(
            "Recipe {} not found",
            recipe_id
        )));
    }
    debug!(recipe_id, "deleted recipe");
    Ok(())
}
