use grocer_core::Querier;

use crate::app::AppContext;
use crate::cli::IngredientCommand;
use crate::output::{ingredients_table, print_json};

pub fn handle_ingredient(ctx: &AppContext, command: &IngredientCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match command {
        IngredientCommand::Search { fragment } => {
            let found = store.execute_tx("ingredient_search", |q| q.search_ingredients(fragment))?;
            if ctx.json() {
                print_json(&found)?;
            } else if found.is_empty() {
                println!("No ingredients match '{}'.", fragment);
            } else {
                println!("{}", ingredients_table(&found));
            }
        }
    }
    Ok(())
}
