use grocer_core::storage::NewSchedule;
use grocer_core::GroceryStore;

use crate::app::AppContext;
use crate::cli::GroceriesCommand;
use crate::output::{print_json, print_schedule, schedules_table};

pub fn handle_groceries(ctx: &AppContext, command: &GroceriesCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    let composition = match command {
        GroceriesCommand::Generate { author, recipes } => {
            let schedule = NewSchedule {
                author: *author,
                recipes: recipes.clone(),
            };
            let composition = store.generate_grocery_list(&schedule)?;
            if ctx.quiet() && !ctx.json() {
                println!("{}", composition.schedule.id);
                return Ok(());
            }
            composition
        }
        GroceriesCommand::Show { id } => store.load_schedule_composition(*id)?,
        GroceriesCommand::List => {
            let schedules = store.list_schedules()?;
            if ctx.json() {
                print_json(&schedules)?;
            } else if ctx.quiet() {
                for schedule in &schedules {
                    println!("{}", schedule.id);
                }
            } else if schedules.is_empty() {
                println!("No schedules yet.");
            } else {
                println!("{}", schedules_table(&schedules));
            }
            return Ok(());
        }
        GroceriesCommand::Delete { id } => {
            store.delete_schedule(*id)?;
            if ctx.json() {
                print_json(&serde_json::json!({ "status": "ok", "schedule_id": id }))?;
            } else if !ctx.quiet() {
                println!("Deleted schedule {}", id);
            }
            return Ok(());
        }
        GroceriesCommand::RemoveRecipe {
            schedule_id,
            recipe_id,
        } => {
            store.remove_schedule_recipe(*schedule_id, *recipe_id)?;
            if ctx.quiet() && !ctx.json() {
                return Ok(());
            }
            store.load_schedule_composition(*schedule_id)?
        }
    };

    if ctx.json() {
        print_json(&composition)?;
    } else {
        print_schedule(&composition);
    }
    Ok(())
}
