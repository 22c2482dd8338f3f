//! Load config from process environment (and `.env`), or from any key lookup.

use crate::config::types::{Config, DatabaseConfig};
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

impl Config {
    /// Read `.env` if present, then build from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Unset or empty keys take defaults; set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        let db_defaults = DatabaseConfig::default();

        let dsn = get("MOVIEDB_DB_DSN")
            .or_else(|| get("DATABASE_URL"))
            .unwrap_or(db_defaults.dsn);

        Ok(Config {
            port: parse_or(&get, "PORT", defaults.port)?,
            env: parse_or(&get, "API_ENV", defaults.env)?,
            db: DatabaseConfig {
                dsn,
                max_open_conns: parse_or(&get, "DB_MAX_OPEN_CONNS", db_defaults.max_open_conns)?,
                min_idle_conns: parse_or(&get, "DB_MIN_IDLE_CONNS", db_defaults.min_idle_conns)?,
                max_idle_time: secs_or(&get, "DB_MAX_IDLE_SECS", db_defaults.max_idle_time)?,
                max_lifetime: secs_or(&get, "DB_MAX_LIFETIME_SECS", db_defaults.max_lifetime)?,
                query_timeout: Duration::from_millis(parse_or(
                    &get,
                    "DB_QUERY_TIMEOUT_MS",
                    db_defaults.query_timeout.as_millis() as u64,
                )?),
            },
            request_timeout: secs_or(&get, "REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            max_body_bytes: parse_or(&get, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            log_format: parse_or(&get, "LOG_FORMAT", defaults.log_format)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn secs_or<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, key, default.as_secs()).map(Duration::from_secs)
}
