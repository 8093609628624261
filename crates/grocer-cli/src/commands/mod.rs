//! Command handlers, one module per subcommand group.

mod completions;
mod groceries;
mod ingredient;
mod init;
mod recipe;
mod unit;
mod user;

use crate::app::AppContext;
use crate::cli::Commands;

pub fn dispatch(ctx: &AppContext, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => init::handle_init(ctx, args),
        Commands::Unit(command) => unit::handle_unit(ctx, command),
        Commands::User(command) => user::handle_user(ctx, command),
        Commands::Ingredient(command) => ingredient::handle_ingredient(ctx, command),
        Commands::Recipe(command) => recipe::handle_recipe(ctx, command),
        Commands::Groceries(command) => groceries::handle_groceries(ctx, command),
        Commands::Completions { shell } => completions::handle_completions(*shell),
    }
}
