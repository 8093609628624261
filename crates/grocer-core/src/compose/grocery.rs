//! Schedule composition and grocery aggregation.

use tracing::debug;

use crate::error::{GrocerError, Result};
use crate::storage::traits::Querier;
use crate::storage::types::{NewSchedule, Schedule, ScheduleComposition, ScheduleRecipe};

use super::validation::validate_new_schedule;

fn compose<Q: Querier + ?Sized>(q: &Q, schedule: Schedule) -> Result<ScheduleComposition> {
    let recipes = q.list_schedule_recipes(schedule.id)?;
    let groceries = q.list_groceries(schedule.id)?;
    Ok(ScheduleComposition {
        schedule,
        recipes,
        groceries,
    })
}

/// Create a schedule with its recipe rows and derive the grocery list.
///
/// Groceries are distinct by ingredient id; amounts are not summed.
pub fn generate_groceries<Q: Querier + ?Sized>(
    q: &Q,
    params: &NewSchedule,
) -> Result<ScheduleComposition> {
    validate_new_schedule(params)?;

    let schedule = q.create_schedule(params.author.as_ref())?;
    for item in &params.recipes {
        let row = ScheduleRecipe {
            schedule_id: schedule.id,
            recipe_id: item.recipe_id,
            portion: item.portion,
        };
        q.create_schedule_recipe(&row).map_err(|err| match err {
            GrocerError::Conflict(_) => GrocerError::Conflict(format!(
                "Recipe {} is listed more than once",
                item.recipe_id
            )),
            other => other,
        })?;
    }

    let composition = compose(q, schedule)?;
    debug!(
        schedule_id = composition.schedule.id,
        recipes = composition.recipes.len(),
        groceries = composition.groceries.len(),
        "generated grocery list"
    );
    Ok(composition)
}

pub fn load_schedule<Q: Querier + ?Sized>(q: &Q, schedule_id: i64) -> Result<ScheduleComposition> {
    let schedule = q
        .get_schedule(schedule_id)?
        .ok_or_else(|| GrocerError::NotFound(format!("Schedule {} not found", schedule_id)))?;
    compose(q, schedule)
}

pub fn delete_schedule<Q: Querier + ?Sized>(q: &Q, schedule_id: i64) -> Result<()> {
    if !q.delete_schedule(schedule_id)? {
        return Err(GrocerError::NotFound(format!(
            "Schedule {} not found",
            schedule_id
        )));
    }
    debug!(schedule_id, "deleted schedule");
    Ok(())
}

pub fn remove_recipe<Q: Querier + ?Sized>(q: &Q, schedule_id: i64, recipe_id: i64) -> Result<()> {
    if !q.delete_schedule_recipe(schedule_id, recipe_id)? {
        return Err(GrocerError::NotFound(format!(
            "Schedule {} has no recipe {}",
            schedule_id, recipe_id
        )));
    }
    Ok(())
}
