use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_retry_delay: Duration,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
                format!(
                    "postgres://{}:{}@{}:{}/{}?sslmode={}",
                    require("DB_USER")?,
                    get("DB_PASSWORD").unwrap_or_default(),
                    require("DB_HOST")?,
                    get("DB_PORT").unwrap_or_else(|| "5432".to_string()),
                    require("DB_NAME")?,
                    get("DB_SSLMODE").unwrap_or_else(|| "disable".to_string()),
                )
            }
        };

        let number = |key: &'static str, default: u32| -> Result<u32, ConfigError> {
            match get(key) {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { key, value }),
                None => Ok(default),
            }
        };

        Ok(AppConfig {
            database_url,
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            max_connections: number("DB_MAX_CONNECTIONS", 5)?,
            connect_attempts: number("DB_CONNECT_ATTEMPTS", 30)?,
            connect_retry_delay: Duration::from_secs(number("DB_CONNECT_RETRY_SECS", 2)?.into()),
        })
    }
}
