use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::token::DEFAULT_TOKEN_TTL_HOURS;

/// Secret used when `JWT_SECRET` is unset. Only suitable for local runs.
pub const DEFAULT_JWT_SECRET: &str = "default_secret";

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

pub struct Config {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_acquire_timeout: Duration,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// `0` selects the bcrypt default cost.
    pub bcrypt_cost: u32,
    pub admin_username: String,
    pub admin_password: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_in_range<T: FromStr + ToString>(
    name: &'static str,
    expected: &'static str,
    default: T,
    accept: impl Fn(&T) -> bool,
) -> Result<T, ConfigError> {
    let value = parse_var(name, expected, default)?;
    if accept(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            expected,
            value: value.to_string(),
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET environment variable not set. Using default secret.");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_acquire_timeout: Duration::from_secs(parse_var(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                "number of seconds",
                5,
            )?),
            server_port: parse_var("SERVER_PORT", "port number", 8080)?,
            server_host: var_or("SERVER_HOST", "127.0.0.1"),
            jwt_secret,
            token_ttl_hours: parse_in_range(
                "TOKEN_TTL_HOURS",
                "number of hours between 1 and 8760",
                DEFAULT_TOKEN_TTL_HOURS,
                |hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours),
            )?,
            bcrypt_cost: parse_in_range(
                "BCRYPT_COST",
                "bcrypt cost (0 or 4 to 31)",
                0,
                |cost| *cost == 0 || (4..=31).contains(cost),
            )?,
            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password: var_or("ADMIN_PASSWORD", "adminpassword"),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
