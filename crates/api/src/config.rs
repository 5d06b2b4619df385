//! Environment-driven server configuration.

use chrono::Duration;
use thiserror::Error;

use unshift_auth::Hs256Jwt;
use unshift_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4040";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid number of hours: {value}")]
    InvalidTtl { name: &'static str, value: String },

    #[error("{0}")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub token_ttl_hours: i64,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            token_ttl_hours: Hs256Jwt::DEFAULT_TTL_HOURS,
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Read `JWT_SECRET`, `BIND_ADDR`, `TOKEN_TTL_HOURS` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or(defaults.jwt_secret);

        let token_ttl_hours = match var("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::InvalidTtl {
                        name: "TOKEN_TTL_HOURS",
                        value: raw,
                    });
                }
            },
            None => defaults.token_ttl_hours,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidLogFormat)?,
            None => defaults.log_format,
        };

        Ok(Self {
            jwt_secret,
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            token_ttl_hours,
            log_format,
        })
    }

    /// True when `JWT_SECRET` was not provided.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }

    pub fn jwt(&self) -> Hs256Jwt {
        Hs256Jwt::with_ttl(self.jwt_secret.as_bytes(), self.token_ttl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr, "0.0.0.0:4040");
        assert_eq!(config.token_ttl_hours, 240);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn values_are_read_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("TOKEN_TTL_HOURS", "2"),
            ("LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.uses_dev_secret());
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.token_ttl(), Duration::hours(2));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("TOKEN_TTL_HOURS", "-1")])),
            Err(ConfigError::InvalidTtl { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("LOG_FORMAT", "xml")])),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }
}
