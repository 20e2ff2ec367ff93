//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (highest to lowest):
//! 1. Environment variables (prefix: `TODO_`, e.g. `TODO_DATABASE_URL`)
//! 2. `todo-server.toml` in the current working directory
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::store::DatabaseSettings;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "todo-server.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TODO_";

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Database connection string, e.g. `ws://localhost:8000` or `mem://`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Database to select inside the namespace
    #[serde(default)]
    pub database_name: Option<String>,

    #[serde(default = "default_namespace")]
    pub database_namespace: String,

    #[serde(default)]
    pub database_username: Option<String>,

    #[serde(default)]
    pub database_password: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_namespace() -> String {
    "todo".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            database_url: None,
            database_name: None,
            database_namespace: default_namespace(),
            database_username: None,
            database_password: None,
        }
    }
}

impl Config {
    /// Load from defaults, the optional config file, then the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection settings, or a message naming what is missing.
    ///
    /// Both the URL and the database name are required.
    pub fn database(&self) -> Result<DatabaseSettings, String> {
        let url = required(&self.database_url, "database_url")?;
        let name = required(&self.database_name, "database_name")?;
        Ok(DatabaseSettings {
            url,
            name,
            namespace: self.database_namespace.clone(),
            username: self.database_username.clone(),
            password: self.database_password.clone(),
        })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!(
            "{key} is not set (set {ENV_PREFIX}{} or add it to {CONFIG_FILE})",
            key.to_uppercase()
        )),
    }
}
