use chrono::Utc;
use std::env;
use std::fmt;

use crate::auth::{MAX_HASH_COST, MIN_HASH_COST};

/// Runtime settings, read from the process environment (and `.env` via `dotenv` in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
    /// The single browser origin allowed by CORS.
    pub cors_origin: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                non_empty("DATABASE_MAX_CONNECTIONS"),
                5,
            )?,
            server_port: parse_or("SERVER_PORT", non_empty("SERVER_PORT"), 8080)?,
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_ttl_hours: check(
                "JWT_TTL_HOURS",
                parse_or("JWT_TTL_HOURS", non_empty("JWT_TTL_HOURS"), 24)?,
                |hours| {
                    hours > 0
                        && chrono::Duration::try_hours(hours)
                            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                            .is_some()
                },
            )?,
            bcrypt_cost: check(
                "BCRYPT_COST",
                parse_or("BCRYPT_COST", non_empty("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
                |cost| (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost),
            )?,
            cors_origin: non_empty("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Rejects a parsed value that is well-formed but unusable.
fn check<T: Copy + ToString>(
    key: &'static str,
    value: T,
    valid: impl Fn(T) -> bool,
) -> Result<T, ConfigError> {
    if valid(value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}
