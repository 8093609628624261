use grocer_core::storage::GroceryStore;
use grocer_core::SqliteStore;

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_database_path, resolve_config_path, write_config, GrocerConfig};
use crate::errors::CliError;
use crate::output::print_json;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid(
            format!("Config already exists at {}", config_path.display()),
            "Use --force to overwrite it.",
        )
        .into());
    }

    let database_path = match (&ctx.cli().db, ctx.config()) {
        (Some(path), _) => path.clone(),
        (None, Some(existing)) => existing.database.path.clone().into(),
        (None, None) => default_database_path()?,
    };

    // Keep log and auth settings from a config being overwritten.
    let mut config = ctx
        .config()
        .cloned()
        .unwrap_or_else(|| GrocerConfig::new(database_path.clone()));
    config.database.path = database_path.to_string_lossy().to_string();
    config.validate()?;

    let store = SqliteStore::open(&database_path, &ctx.store_options())?;
    store.check_integrity()?;
    write_config(&config_path, &config)?;
    tracing::info!(database = %database_path.display(), "initialized");

    if ctx.json() {
        print_json(&serde_json::json!({
            "status": "ok",
            "database": database_path,
            "config": config_path,
        }))?;
    } else if !ctx.quiet() {
        println!("Initialized grocer database at {}", database_path.display());
        println!("Config written to {}", config_path.display());
    }
    Ok(())
}
