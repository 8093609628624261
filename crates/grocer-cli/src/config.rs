use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Length in bytes of a symmetric token key.
pub const TOKEN_KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrocerConfig {
    pub database: DatabaseSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Upper bound on one unit of work; unset means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

/// Settings for the token service. Carried in the config file only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSection {
    pub token_symmetric_key: Option<String>,
    #[serde(default = "default_access_token_duration_secs")]
    pub access_token_duration_secs: u64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            token_symmetric_key: None,
            access_token_duration_secs: default_access_token_duration_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LogSection {
    pub level: Option<String>,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_access_token_duration_secs() -> u64 {
    900
}

impl GrocerConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database: DatabaseSection {
                path: database_path.to_string_lossy().to_string(),
                busy_timeout_ms: default_busy_timeout_ms(),
                deadline_ms: None,
            },
            auth: AuthSection::default(),
            log: LogSection::default(),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.database.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(anyhow::anyhow!("database.path must not be empty"));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(anyhow::anyhow!("database.busy_timeout_ms must be positive"));
        }
        if self.database.deadline_ms == Some(0) {
            return Err(anyhow::anyhow!("database.deadline_ms must be positive"));
        }
        if let Some(key) = &self.auth.token_symmetric_key {
            if key.len() != TOKEN_KEY_LEN {
                return Err(anyhow::anyhow!(
                    "auth.token_symmetric_key must be exactly {} bytes, got {}",
                    TOKEN_KEY_LEN,
                    key.len()
                ));
            }
        }
        if self.auth.access_token_duration_secs == 0 {
            return Err(anyhow::anyhow!(
                "auth.access_token_duration_secs must be positive"
            ));
        }
        Ok(())
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("grocer.db"))
}

/// Resolve the config file path, checking GROCER_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("GROCER_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn read_config(path: &Path) -> anyhow::Result<GrocerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: GrocerConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &GrocerConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("grocer"));
        }
    }
    Ok(home_dir()?.join(".config").join("grocer"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("grocer"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("grocer"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
