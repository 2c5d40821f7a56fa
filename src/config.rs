//! Configuration loading for database and language-model access.
//!
//! Settings are layered: built-in defaults, then an optional
//! `.query_agent.json` file, then environment variables. Credentials are
//! usually supplied through the environment; the file is the place for
//! retrieval limits, the synthesis strategy and prompt hints.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::retrieval::RetrievalLimits;
use crate::synth::StrategyKind;

/// Name of the config file looked up in the working and home directories.
pub const CONFIG_FILE_NAME: &str = ".query_agent.json";

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_SCHEMA: &str = "public";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {key}: {hint}")]
    Missing {
        key: &'static str,
        hint: &'static str,
    },

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file '{path}': {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid JSON in config file '{path}': {message}")]
    InvalidFile { path: String, message: String },
}

/// Top-level configuration file structure.
///
/// Every field is optional; anything left out falls through to the
/// environment or the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub database: DatabaseFile,
    pub llm: LlmFile,
    pub retrieval: RetrievalSettings,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Schema holding the comment tables
    pub schema: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmFile {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl std::fmt::Debug for DatabaseFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseFile")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .field("schema", &self.schema)
            .field("connection_string", &redacted(&self.connection_string))
            .finish()
    }
}

impl std::fmt::Debug for LlmFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmFile")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Debug stand-in for a secret: shows whether it is set, never its value.
fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

/// Retrieval and synthesis tuning. Only ever read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    #[serde(flatten)]
    pub limits: RetrievalLimits,
    pub strategy: StrategyKind,
    /// Extra numbered instructions added to the prompt (domain conventions)
    pub prompt_hints: Vec<String>,
    /// Characters of rendered context echoed back with a generated query
    pub preview_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            limits: RetrievalLimits::default(),
            strategy: StrategyKind::default(),
            prompt_hints: Vec::new(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl ConfigFile {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Resolved PostgreSQL connection settings.
#[derive(Clone, PartialEq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub schema: String,
    /// May embed a password, so it is redacted from `Debug` output
    pub connection_string: Option<String>,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .field("schema", &self.schema)
            .field("connection_string", &redacted(&self.connection_string))
            .finish()
    }
}

impl DatabaseSettings {
    /// Human-readable target without the password.
    pub fn describe(&self) -> String {
        if self.connection_string.is_some() {
            return "DATABASE_URL".to_string();
        }
        format!(
            "{}@{}:{}/{}",
            self.user.as_deref().unwrap_or(""),
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }

    /// Build a `postgres::Config`, preferring the connection string.
    pub fn to_pg_config(&self) -> Result<postgres::Config, String> {
        if let Some(url) = &self.connection_string {
            return url.parse::<postgres::Config>().map_err(|e| e.to_string());
        }

        let mut config = postgres::Config::new();
        config.host(&self.host).port(self.port);
        if let Some(database) = &self.database {
            config.dbname(database);
        }
        if let Some(user) = &self.user {
            config.user(user);
        }
        if let Some(password) = &self.password {
            config.password(password);
        }
        Ok(config)
    }
}

/// Resolved chat-completions endpoint settings.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
}

impl AppConfig {
    /// Resolve from an optional config file and the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = config_path.map(ConfigFile::load).transpose()?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Resolve from a config file and an environment lookup.
    ///
    /// Environment values win over file values; empty values count as unset.
    pub fn from_sources<F>(file: Option<ConfigFile>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let port = match var("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "DB_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => file.database.port.unwrap_or(DEFAULT_DB_PORT),
        };

        let database = DatabaseSettings {
            host: var("DB_HOST")
                .or(file.database.host)
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port,
            database: var("DB_NAME").or(file.database.database),
            user: var("DB_USER").or(file.database.user),
            password: var("DB_PASSWORD").or(file.database.password),
            schema: var("DB_SCHEMA")
                .or(file.database.schema)
                .unwrap_or_else(|| DEFAULT_DB_SCHEMA.to_string()),
            connection_string: var("DATABASE_URL").or(file.database.connection_string),
        };

        if database.connection_string.is_none() {
            if database.database.is_none() {
                return Err(ConfigError::Missing {
                    key: "DB_NAME",
                    hint: "set DB_NAME (or DATABASE_URL) in the environment or database.database in the config file",
                });
            }
            if database.user.is_none() {
                return Err(ConfigError::Missing {
                    key: "DB_USER",
                    hint: "set DB_USER in the environment or database.user in the config file",
                });
            }
        }

        let api_key = var("OPENAI_API_KEY")
            .or(file.llm.api_key)
            .ok_or(ConfigError::Missing {
                key: "OPENAI_API_KEY",
                hint: "set OPENAI_API_KEY in the environment or llm.api_key in the config file",
            })?;

        let temperature = file.llm.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "llm.temperature",
                value: temperature.to_string(),
                reason: "expected a value between 0 and 2".to_string(),
            });
        }

        let llm = LlmSettings {
            api_key,
            model: var("OPENAI_MODEL")
                .or(file.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("OPENAI_BASE_URL")
                .or(file.llm.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature,
            max_tokens: file.llm.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };

        Ok(Self {
            database,
            llm,
            retrieval: file.retrieval,
        })
    }
}
