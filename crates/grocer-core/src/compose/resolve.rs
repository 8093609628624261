//! Get-or-create resolution of ingredient lines.

use tracing::debug;

use crate::error::{GrocerError, Result};
use crate::storage::traits::Querier;
use crate::storage::types::{Ingredient, IngredientLine, IngredientRef, NewIngredient};

/// Create the named ingredient, or reuse the row that already holds the name.
///
/// Surrounding whitespace is not part of the name. Two steps: `try_create_ingredient`, then on a name conflict
/// `find_ingredient_by_name`. A concurrent writer that wins the insert is
/// picked up by the lookup, so both callers end up with the same id.
pub fn resolve_ingredient<Q: Querier + ?Sized>(
    q: &Q,
    name: &str,
    default_unit: i64,
) -> Result<Ingredient> {
    let name = name.trim();
    let candidate = NewIngredient::new(name).with_default_unit(default_unit);
    if let Some(created) = q.try_create_ingredient(&candidate)? {
        debug!(ingredient_id = created.id, name, "created ingredient");
        return Ok(created);
    }

    let existing = q.find_ingredient_by_name(name)?.ok_or_else(|| {
        GrocerError::Conflict(format!(
            "Ingredient '{}' conflicts with a row that cannot be read",
            name
        ))
    })?;
    debug!(ingredient_id = existing.id, name, "reused existing ingredient");
    Ok(existing)
}

/// Ingredient id a line points at, creating the ingredient when needed.
pub fn resolve_line<Q: Querier + ?Sized>(q: &Q, line: &IngredientLine) -> Result<i64> {
    match &line.ingredient {
        IngredientRef::Existing(id) => Ok(*id),
        IngredientRef::New(name) => Ok(resolve_ingredient(q, name, line.unit_id)?.id),
    }
}
