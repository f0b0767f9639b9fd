//! Process-wide settings, loaded once at startup from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::ai::AiProvider;
use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed.
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the HTTP server and everything it builds.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Number of actix workers; actix picks one per core when unset.
    pub workers: Option<usize>,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
    pub database: DatabaseConfig,
    pub ai: AiConfig,
}

/// Connection pool settings for the relational store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle.
    pub pool_size: u32,
    /// Extra connections allowed on top of `pool_size` under load.
    pub max_overflow: u32,
    /// How long a request waits for a free connection.
    pub pool_timeout: Duration,
    /// Connections older than this are closed and replaced.
    pub pool_recycle: Duration,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    /// Pool settings for `url` with the default sizing.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: 10,
            max_overflow: 20,
            pool_timeout: Duration::from_secs(30),
            pool_recycle: Duration::from_secs(300),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Settings for the generative-text backend.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DatabaseConfig::new(
            lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
        );

        let database = DatabaseConfig {
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", defaults.pool_size)?,
            max_overflow: parse_or(&lookup, "DB_MAX_OVERFLOW", defaults.max_overflow)?,
            pool_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_TIMEOUT_SECS",
                defaults.pool_timeout.as_secs(),
            )?),
            pool_recycle: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_RECYCLE_SECS",
                defaults.pool_recycle.as_secs(),
            )?),
            busy_timeout: Duration::from_millis(parse_or(
                &lookup,
                "DB_BUSY_TIMEOUT_MS",
                defaults.busy_timeout.as_millis() as u64,
            )?),
            ..defaults
        };

        if database.pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                value: "0".to_string(),
                reason: "pool size must be at least 1".to_string(),
            });
        }

        let provider = match lookup("AI_PROVIDER") {
            Some(value) => value.parse().map_err(|err: crate::ai::AiError| {
                ConfigError::Invalid {
                    key: "AI_PROVIDER",
                    value: value.clone(),
                    reason: err.to_string(),
                }
            })?,
            None => AiProvider::default(),
        };

        let ai = AiConfig {
            provider,
            api_key: lookup("GOOGLE_API_KEY").unwrap_or_default(),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let workers = match lookup("WORKERS") {
            Some(value) => Some(parse_value("WORKERS", &value)?),
            None => None,
        };

        Ok(Self {
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            workers,
            cors_origins: cors_origins(lookup("CORS_ORIGINS").as_deref()),
            database,
            ai,
        })
    }
}

/// Split a comma-separated origin list, falling back to the local frontend.
fn cors_origins(value: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_CORS_ORIGIN.to_string()]
    } else {
        origins
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).expect("defaults");

        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, None);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.database.url, "app.db");
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.database.max_overflow, 20);
        assert_eq!(config.database.pool_timeout, Duration::from_secs(30));
        assert_eq!(config.database.pool_recycle, Duration::from_secs(300));
        assert_eq!(config.ai.provider, AiProvider::Gemini);
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert!(config.ai.api_key.is_empty());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = load(&[
            ("ADDRESS", "0.0.0.0"),
            ("PORT", "8000"),
            ("WORKERS", "4"),
            ("DATABASE_URL", "catalog.db"),
            ("DB_POOL_SIZE", "2"),
            ("DB_POOL_RECYCLE_SECS", "60"),
            ("AI_PROVIDER", "GEMINI"),
            ("GOOGLE_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-pro"),
        ])
        .expect("config");

        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.database.url, "catalog.db");
        assert_eq!(config.database.pool_size, 2);
        assert_eq!(config.database.pool_recycle, Duration::from_secs(60));
        assert_eq!(config.ai.api_key, "secret");
        assert_eq!(config.ai.model, "gemini-pro");
    }

    #[test]
    fn cors_origins_are_split_on_commas() {
        let config = load(&[(
            "CORS_ORIGINS",
            "https://shop.example.com, http://localhost:5173,,",
        )])
        .expect("config");

        assert_eq!(
            config.cors_origins,
            vec![
                "https://shop.example.com".to_string(),
                "http://localhost:5173".to_string(),
            ]
        );
    }

    #[test]
    fn blank_cors_origins_fall_back_to_default() {
        let config = load(&[("CORS_ORIGINS", " , ")]).expect("config");

        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = load(&[("PORT", "eighty")]).expect_err("bad port");

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = load(&[("AI_PROVIDER", "vertex")]).expect_err("bad provider");

        assert!(matches!(err, ConfigError::Invalid { key: "AI_PROVIDER", .. }));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = load(&[("DB_POOL_SIZE", "0")]).expect_err("empty pool");

        assert!(matches!(err, ConfigError::Invalid { key: "DB_POOL_SIZE", .. }));
    }
}
