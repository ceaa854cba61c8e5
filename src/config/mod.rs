mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load and validate configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = parse_config(path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read and parse a TOML config file without validating it.
///
/// Callers that layer overrides on top must run [`validate_config`] on the
/// merged result.
pub fn parse_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// First existing file among the default config locations
pub fn find_default_config() -> Option<PathBuf> {
    let default_paths = [
        "./picvault.toml",
        "./config.toml",
        "~/.config/picvault/config.toml",
        "/etc/picvault/config.toml",
    ];

    default_paths
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}

/// Resolve the SQLite path, anchoring relative paths to the config file's
/// directory.
pub fn resolve_database_path(config: &Config, config_path: Option<&Path>) -> PathBuf {
    let db_path = &config.database.path;
    if db_path.is_absolute() {
        return db_path.clone();
    }

    let base = config_path
        .and_then(|p| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    base.join(db_path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.database.pool_size == 0 {
        anyhow::bail!("Database pool_size must be at least 1");
    }

    if config.admin.init_password.is_empty() {
        anyhow::bail!("admin.init_password cannot be empty");
    }

    if config.admin.init_password == "init" {
        tracing::warn!("admin.init_password is the default value; anyone can reset the table");
    }

    Ok(())
}
