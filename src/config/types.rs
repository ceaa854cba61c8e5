use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file. Relative paths are resolved against the config file's
    /// directory, or the working directory when no config file is used.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Number of pooled SQLite connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("picvault.db")
}
fn default_pool_size() -> u32 {
    4
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Shared secret required by `POST /app3/init-database`
    #[serde(default = "default_init_password")]
    pub init_password: String,
}

fn default_init_password() -> String {
    "init".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            init_password: default_init_password(),
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("init_password", &"<redacted>")
            .finish()
    }
}
