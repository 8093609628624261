//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

use grocer_core::storage::{IngredientLine, RecipePortion};
use grocer_core::VERSION;

/// Grocer - plan meals from recipes and derive grocery lists
#[derive(Parser, Debug)]
#[command(name = "grocer")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the grocer database
    #[arg(long, global = true, env = "GROCER_DB")]
    pub db: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode (created ids only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default config and create the database
    Init(InitArgs),

    /// Manage units of measure
    #[command(subcommand)]
    Unit(UnitCommand),

    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Look up ingredients
    #[command(subcommand)]
    Ingredient(IngredientCommand),

    /// Create, show and edit recipes
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Build and show grocery lists
    #[command(subcommand)]
    Groceries(GroceriesCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum UnitCommand {
    /// Add a unit of measure
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// List all units
    List,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a user that can author recipes
    Add {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum IngredientCommand {
    /// Find ingredients whose name contains FRAGMENT
    Search {
        #[arg(value_name = "FRAGMENT")]
        fragment: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// Create a recipe together with its ingredients
    Create(RecipeCreateArgs),
    /// Show a recipe and its ingredient list
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Overwrite a recipe's fields and merge ingredient lines
    Update(RecipeUpdateArgs),
    /// Drop one ingredient from a recipe
    RemoveIngredient {
        #[arg(value_name = "RECIPE_ID")]
        recipe_id: i64,
        #[arg(value_name = "INGREDIENT_ID")]
        ingredient_id: i64,
    },
    /// List all recipes
    List,
    /// Delete a recipe; its ingredients stay
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct RecipeFieldArgs {
    /// Recipe name
    #[arg(long)]
    pub name: String,

    /// Number of portions the recipe yields
    #[arg(long)]
    pub portion: i32,

    /// Preparation steps
    #[arg(long)]
    pub steps: Option<String>,

    /// Ingredient line: name=<text>:<amount>:<unit_id> or id=<n>:<amount>:<unit_id>
    #[arg(long = "ingredient", value_name = "SPEC", value_parser = parse_ingredient_spec)]
    pub ingredients: Vec<IngredientLine>,
}

#[derive(Args, Debug)]
pub struct RecipeCreateArgs {
    /// Author user id
    #[arg(long)]
    pub author: Uuid,

    #[command(flatten)]
    pub fields: RecipeFieldArgs,
}

#[derive(Args, Debug)]
pub struct RecipeUpdateArgs {
    #[arg(value_name = "ID")]
    pub id: i64,

    #[command(flatten)]
    pub fields: RecipeFieldArgs,
}

#[derive(Subcommand, Debug)]
pub enum GroceriesCommand {
    /// Create a schedule from recipes and print its grocery list
    Generate {
        /// Author user id
        #[arg(long)]
        author: Option<Uuid>,

        /// Recipe to cook: <ID>:<PORTION>
        #[arg(long = "recipe", value_name = "ID:PORTION", required = true, value_parser = parse_recipe_portion)]
        recipes: Vec<RecipePortion>,
    },
    /// Show a stored schedule and its grocery list
    Show {
        #[arg(value_name = "SCHEDULE_ID")]
        id: i64,
    },
    /// List stored schedules, newest first
    List,
    /// Delete a schedule; its recipes stay
    Delete {
        #[arg(value_name = "SCHEDULE_ID")]
        id: i64,
    },
    /// Take one recipe off a schedule
    RemoveRecipe {
        #[arg(value_name = "SCHEDULE_ID")]
        schedule_id: i64,
        #[arg(value_name = "RECIPE_ID")]
        recipe_id: i64,
    },
}

/// Parse `name=<text>:<amount>:<unit_id>` or `id=<n>:<amount>:<unit_id>`.
///
/// Names may contain `:`; amount and unit are taken from the right.
pub fn parse_ingredient_spec(value: &str) -> Result<IngredientLine, String> {
    let mut parts = value.rsplitn(3, ':');
    let unit = parts.next();
    let amount = parts.next();
    let reference = parts.next();
    let (Some(reference), Some(amount), Some(unit)) = (reference, amount, unit) else {
        return Err(format!(
            "expected name=<text>:<amount>:<unit_id> or id=<n>:<amount>:<unit_id>, got '{}'",
            value
        ));
    };

    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount '{}'", amount))?;
    let unit_id: i64 = unit
        .trim()
        .parse()
        .map_err(|_| format!("invalid unit id '{}'", unit))?;

    let (id, name) = if let Some(id) = reference.strip_prefix("id=") {
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid ingredient id '{}'", id))?;
        (Some(id), None)
    } else if let Some(name) = reference.strip_prefix("name=") {
        (None, Some(name))
    } else {
        return Err(format!(
            "ingredient must start with 'name=' or 'id=', got '{}'",
            reference
        ));
    };

    IngredientLine::from_parts(id, name, amount, unit_id).map_err(|e| e.to_string())
}

/// Parse `<ID>:<PORTION>`.
pub fn parse_recipe_portion(value: &str) -> Result<RecipePortion, String> {
    let (id, portion) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <ID>:<PORTION>, got '{}'", value))?;
    let recipe_id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid recipe id '{}'", id))?;
    let portion = portion
        .trim()
        .parse()
        .map_err(|_| format!("invalid portion '{}'", portion))?;
    Ok(RecipePortion { recipe_id, portion })
}
