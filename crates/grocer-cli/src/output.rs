//! Table and JSON rendering for command output.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use grocer_core::storage::{
    Ingredient, Recipe, RecipeComposition, Schedule, ScheduleComposition, Unit,
};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub fn units_table(units: &[Unit]) -> Table {
    let mut table = table(&["ID", "Unit"]);
    for unit in units {
        table.add_row(vec![unit.id.to_string(), unit.name.clone()]);
    }
    table
}

pub fn ingredients_table(ingredients: &[Ingredient]) -> Table {
    let mut table = table(&["ID", "Ingredient", "Default unit"]);
    for ingredient in ingredients {
        table.add_row(vec![
            ingredient.id.to_string(),
            ingredient.name.clone(),
            ingredient
                .default_unit
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ]);
    }
    table
}

pub fn recipes_table(recipes: &[Recipe]) -> Table {
    let mut table = table(&["ID", "Recipe", "Portions", "Modified"]);
    for recipe in recipes {
        table.add_row(vec![
            recipe.id.to_string(),
            recipe.name.clone(),
            recipe.portion.to_string(),
            recipe.modified_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

pub fn schedules_table(schedules: &[Schedule]) -> Table {
    let mut table = table(&["ID", "Author", "Created"]);
    for schedule in schedules {
        table.add_row(vec![
            schedule.id.to_string(),
            schedule
                .author
                .map(|author| author.to_string())
                .unwrap_or_default(),
            schedule.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

pub fn print_recipe(composition: &RecipeComposition) {
    let recipe = &composition.recipe;
    println!("Recipe:    {} (#{})", recipe.name, recipe.id);
    println!("Author:    {}", recipe.author);
    println!("Portions:  {}", recipe.portion);
    println!(
        "Modified:  {}",
        recipe.modified_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(steps) = &recipe.steps {
        println!("Steps:     {}", steps);
    }

    if composition.ingredients.is_empty() {
        println!("No ingredients.");
        return;
    }
    let mut table = table(&["ID", "Ingredient", "Amount", "Unit"]);
    for line in &composition.ingredients {
        table.add_row(vec![
            line.ingredient_id.to_string(),
            line.name.clone(),
            amount(line.amount),
            line.unit_name.clone(),
        ]);
    }
    println!("{table}");
}

pub fn print_schedule(composition: &ScheduleComposition) {
    let schedule = &composition.schedule;
    println!("Schedule:  #{}", schedule.id);
    if let Some(author) = schedule.author {
        println!("Author:    {}", author);
    }
    println!(
        "Created:   {}",
        schedule.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    let mut recipes = table(&["Recipe", "Name", "Portions"]);
    for row in &composition.recipes {
        recipes.add_row(vec![
            row.recipe_id.to_string(),
            row.name.clone(),
            row.portion.to_string(),
        ]);
    }
    println!("{recipes}");

    if composition.groceries.is_empty() {
        println!("Nothing to buy.");
        return;
    }
    let mut groceries = table(&["Ingredient", "Grocery"]);
    for grocery in &composition.groceries {
        groceries.add_row(vec![grocery.ingredient_id.to_string(), grocery.name.clone()]);
    }
    println!("{groceries}");
}
