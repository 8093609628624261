use grocer_core::{GrocerError, Querier};

use crate::app::AppContext;
use crate::cli::UserCommand;
use crate::output::print_json;

pub fn handle_user(ctx: &AppContext, command: &UserCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match command {
        UserCommand::Add { username } => {
            let username = username.trim();
            if username.is_empty() {
                return Err(
                    GrocerError::Validation("Username must not be empty".to_string()).into(),
                );
            }
            let user = store.execute_tx("user_add", |q| q.create_user(username))?;
            if ctx.json() {
                print_json(&user)?;
            } else if ctx.quiet() {
                println!("{}", user.id);
            } else {
                println!("Added user '{}' with id {}", user.username, user.id);
            }
        }
    }
    Ok(())
}
