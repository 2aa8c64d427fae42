//! # Configuration Management for FormQuery
//!
//! This crate provides centralized configuration structures for all FormQuery components:
//! SQL generation options, query history storage, and the optional database connection
//! used to execute generated queries.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{GeneratorConfig, HistoryConfig, Layout, ParameterStyle};
//!
//! let generator = GeneratorConfig::new(ParameterStyle::Numbered, true, Layout::Multiline);
//! let history = HistoryConfig::new(
//!     "query_history.json".to_string(),
//!     "saved_queries.json".to_string(),
//!     50,
//! );
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [generator]
//! parameter_style = "inline"
//! trailing_semicolon = false
//! layout = "single_line"
//!
//! [history]
//! history_path = "query_history.json"
//! saved_path = "saved_queries.json"
//! max_entries = 50
//!
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "reports"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 5
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from formquery.toml (or the path in FORMQUERY_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./formquery.toml";
const CONFIG_PATH_VAR: &str = "FORMQUERY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// Only needed when generated queries are executed
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// How literal values are placed into generated SQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStyle {
    /// Escaped literals are written directly into the SQL text
    #[default]
    Inline,
    /// Literals become `$1, $2, ...` markers with values returned separately
    Numbered,
}

/// Clause layout of generated SQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    SingleLine,
    /// One clause per line
    Multiline,
}

/// SQL generation options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub parameter_style: ParameterStyle,
    pub trailing_semicolon: bool,
    pub layout: Layout,
}

/// Query history storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub history_path: String,
    pub saved_path: String,
    /// Oldest history entries are evicted past this count
    pub max_entries: usize,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env / the environment, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            // A missing .env file is fine; a malformed one is not
            if !err.not_found() {
                return Err(err.into());
            }
        }

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        // History validations
        if self.history.history_path.is_empty() {
            return Err(ConfigError::Invalid(
                "History history_path cannot be empty".to_string(),
            ));
        }
        if self.history.saved_path.is_empty() {
            return Err(ConfigError::Invalid(
                "History saved_path cannot be empty".to_string(),
            ));
        }
        if self.history.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "History max_entries must be greater than 0".to_string(),
            ));
        }

        // Database validations
        if let Some(database) = &self.database {
            if database.host.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database host cannot be empty".to_string(),
                ));
            }
            if database.port == 0 {
                return Err(ConfigError::Invalid(
                    "Database port cannot be zero".to_string(),
                ));
            }
            if database.database.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database name cannot be empty".to_string(),
                ));
            }
            if database.username.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database username cannot be empty".to_string(),
                ));
            }
            if database.min_connections == 0 {
                return Err(ConfigError::Invalid(
                    "Database min_connections must be greater than 0".to_string(),
                ));
            }
            if database.min_connections > database.max_connections {
                return Err(ConfigError::Invalid(
                    "Database min_connections cannot be greater than max_connections".to_string(),
                ));
            }
            if database.connection_timeout_seconds == 0 {
                return Err(ConfigError::Invalid(
                    "Database connection_timeout_seconds must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl GeneratorConfig {
    /// Create a new generator configuration
    pub fn new(parameter_style: ParameterStyle, trailing_semicolon: bool, layout: Layout) -> Self {
        Self {
            parameter_style,
            trailing_semicolon,
            layout,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_path: "query_history.json".to_string(),
            saved_path: "saved_queries.json".to_string(),
            max_entries: 50,
        }
    }
}

impl HistoryConfig {
    /// Create a new history configuration
    pub fn new(history_path: String, saved_path: String, max_entries: usize) -> Self {
        Self {
            history_path,
            saved_path,
            max_entries,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}
