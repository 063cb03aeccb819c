use chrono::{FixedOffset, Offset, Utc};
use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    /// Offset from UTC used to decide which day "today" is
    pub utc_offset: FixedOffset,
    /// Reject malformed query parameters instead of ignoring them
    pub strict_query_params: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            bind_addr: parse_or(
                &lookup,
                "BIND_ADDR",
                SocketAddr::from(([0, 0, 0, 0], 3000)),
            )?,
            utc_offset: parse_or(&lookup, "SCHEDULE_UTC_OFFSET", Utc.fix())?,
            strict_query_params: parse_or(&lookup, "STRICT_QUERY_PARAMS", false)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/school")]).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/school");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert!(!config.strict_query_params);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/school"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SCHEDULE_UTC_OFFSET", "+02:00"),
            ("STRICT_QUERY_PARAMS", "true"),
        ])
        .unwrap();
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.utc_offset.local_minus_utc(), 2 * 3600);
        assert!(config.strict_query_params);
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_invalid_value() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/school"),
            ("SCHEDULE_UTC_OFFSET", "tomorrow"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "SCHEDULE_UTC_OFFSET", .. }
        ));
    }
}
