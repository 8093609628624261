use grocer_core::Querier;

use crate::app::AppContext;
use crate::cli::UnitCommand;
use crate::output::{print_json, units_table};

pub fn handle_unit(ctx: &AppContext, command: &UnitCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match command {
        UnitCommand::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(grocer_core::GrocerError::Validation(
                    "Unit name must not be empty".to_string(),
                )
                .into());
            }
            let unit = store.execute_tx("unit_add", |q| q.create_unit(name))?;
            if ctx.json() {
                print_json(&unit)?;
            } else if ctx.quiet() {
                println!("{}", unit.id);
            } else {
                println!("Added unit '{}' with id {}", unit.name, unit.id);
            }
        }
        UnitCommand::List => {
            let units = store.execute_tx("unit_list", |q| q.list_units())?;
            if ctx.json() {
                print_json(&units)?;
            } else if units.is_empty() {
                println!("No units. Add one with `grocer unit add <NAME>`.");
            } else {
                println!("{}", units_table(&units));
            }
        }
    }
    Ok(())
}
