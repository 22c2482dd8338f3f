//! Runtime configuration for the API and its database pool.

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment reported by the health check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(ConfigError::Invalid {
                key: "API_ENV",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                key: "LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

/// Pool sizing and per-operation deadline.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_open_conns: u32,
    /// Connections the pool keeps open even when idle.
    pub min_idle_conns: u32,
    pub max_idle_time: Duration,
    pub max_lifetime: Duration,
    pub query_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            dsn: "postgres://localhost/movies".into(),
            max_open_conns: 25,
            min_idle_conns: 0,
            max_idle_time: Duration::from_secs(15 * 60),
            max_lifetime: Duration::from_secs(60 * 60),
            query_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub env: Environment,
    pub db: DatabaseConfig,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 4000,
            env: Environment::default(),
            db: DatabaseConfig::default(),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 1_048_576,
            log_format: LogFormat::default(),
        }
    }
}

/// Version string reported by the health check and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
