//! Application context shared by command handlers.

use std::path::PathBuf;

use grocer_core::{SqliteStore, StoreOptions};

use crate::cli::Cli;
use crate::config::{read_config, resolve_config_path, GrocerConfig};
use crate::errors::CliError;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: Option<GrocerConfig>,
}

impl<'a> AppContext<'a> {
    /// Load the config file if one exists.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = if config_path.exists() {
            Some(read_config(&config_path)?)
        } else {
            None
        };
        Ok(Self { cli, config })
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn config(&self) -> Option<&GrocerConfig> {
        self.config.as_ref()
    }

    pub fn json(&self) -> bool {
        self.cli.json
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn log_level(&self) -> Option<&str> {
        self.config.as_ref()?.log.level.as_deref()
    }

    /// Database path from `--db`/`GROCER_DB`, then the config file.
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.cli.db {
            return Ok(path.clone());
        }
        match &self.config {
            Some(config) => Ok(PathBuf::from(&config.database.path)),
            None => Err(CliError::not_found(
                "No grocer database configured",
                "Run:\n  grocer init\n\nOr specify a database path:\n  GROCER_DB=/path/to/grocer.db grocer init",
            )
            .into()),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        let Some(config) = &self.config else {
            return StoreOptions::default();
        };
        let options = StoreOptions::default().busy_timeout(config.busy_timeout());
        match config.deadline() {
            Some(deadline) => options.deadline(deadline),
            None => options,
        }
    }

    /// Open the store. Commands other than `init` require the file to exist.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.database_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                format!("No grocer database found at {}", path.display()),
                "Run:\n  grocer init",
            )
            .into());
        }
        Ok(SqliteStore::open(&path, &self.store_options())?)
    }
}
