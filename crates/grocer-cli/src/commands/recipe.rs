use grocer_core::storage::{NewRecipe, RecipeComposition, RecipeFields, UpdateRecipe};
use grocer_core::GroceryStore;

use crate::app::AppContext;
use crate::cli::{RecipeCommand, RecipeFieldArgs};
use crate::output::{print_json, print_recipe, recipes_table};

fn recipe_fields(args: &RecipeFieldArgs) -> RecipeFields {
    let fields = RecipeFields::new(args.name.trim(), args.portion);
    match &args.steps {
        Some(steps) => fields.with_steps(steps.as_str()),
        None => fields,
    }
}

fn report(ctx: &AppContext, composition: &RecipeComposition, verb: &str) -> anyhow::Result<()> {
    if ctx.json() {
        print_json(composition)?;
    } else if ctx.quiet() {
        println!("{}", composition.recipe.id);
    } else {
        println!(
            "{} recipe '{}' with {} ingredient(s)",
            verb,
            composition.recipe.name,
            composition.ingredients.len()
        );
        print_recipe(composition);
    }
    Ok(())
}

pub fn handle_recipe(ctx: &AppContext, command: &RecipeCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match command {
        RecipeCommand::Create(args) => {
            let recipe = NewRecipe::new(args.author, recipe_fields(&args.fields))
                .with_ingredients(args.fields.ingredients.clone());
            let composition = store.create_recipe_with_ingredients(&recipe)?;
            report(ctx, &composition, "Created")
        }
        RecipeCommand::Show { id } => {
            let composition = store.load_recipe_composition(*id)?;
            if ctx.json() {
                print_json(&composition)?;
            } else {
                print_recipe(&composition);
            }
            Ok(())
        }
        RecipeCommand::Update(args) => {
            let update = UpdateRecipe::new(args.id, recipe_fields(&args.fields))
                .with_ingredients(args.fields.ingredients.clone());
            let composition = store.update_recipe_composition(&update)?;
            report(ctx, &composition, "Updated")
        }
        RecipeCommand::RemoveIngredient {
            recipe_id,
            ingredient_id,
        } => {
            store.remove_recipe_ingredient(*recipe_id, *ingredient_id)?;
            if ctx.json() {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "recipe_id": recipe_id,
                    "ingredient_id": ingredient_id,
                }))?;
            } else if !ctx.quiet() {
                println!(
                    "Removed ingredient {} from recipe {}",
                    ingredient_id, recipe_id
                );
            }
            Ok(())
        }
        RecipeCommand::List => {
            let recipes = store.list_recipes()?;
            if ctx.json() {
                print_json(&recipes)?;
            } else if ctx.quiet() {
                for recipe in &recipes {
                    println!("{}", recipe.id);
                }
            } else if recipes.is_empty() {
                println!("No recipes yet.");
            } else {
                println!("{}", recipes_table(&recipes));
            }
            Ok(())
        }
        RecipeCommand::Delete { id } => {
            store.delete_recipe(*id)?;
            if ctx.json() {
                print_json(&serde_json::json!({ "status": "ok", "recipe_id": id }))?;
            } else if !ctx.quiet() {
                println!("Deleted recipe {}", id);
            }
            Ok(())
        }
    }
}
