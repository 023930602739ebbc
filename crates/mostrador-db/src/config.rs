//! Ledger configuration.
//!
//! Loaded from `MOSTRADOR_*` environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use mostrador_core::DEFAULT_UPCOMING_CHECK_DAYS;

use crate::pool::DbConfig;

/// Default number of attempts for a sale registration that hits lock
/// contention.
pub const DEFAULT_REGISTER_ATTEMPTS: u32 = 3;

/// Longest accepted upcoming-check window, in days (ten years).
pub const MAX_UPCOMING_CHECK_DAYS: i64 = 3_660;

/// Ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Database settings (path, pool size, busy timeout)
    pub db: DbConfig,

    /// Attempts for `register` when the write lock can't be taken
    pub register_attempts: u32,

    /// Window used by `upcoming_checks` when the caller has none
    pub upcoming_check_days: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            db: DbConfig::new("mostrador.db"),
            register_attempts: DEFAULT_REGISTER_ATTEMPTS,
            upcoming_check_days: DEFAULT_UPCOMING_CHECK_DAYS,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                        | Default        |
    /// |---------------------------------|----------------|
    /// | `MOSTRADOR_DB_PATH`             | `mostrador.db` |
    /// | `MOSTRADOR_MAX_CONNECTIONS`     | `5`            |
    /// | `MOSTRADOR_BUSY_TIMEOUT_SECS`   | `5`            |
    /// | `MOSTRADOR_REGISTER_ATTEMPTS`   | `3`            |
    /// | `MOSTRADOR_UPCOMING_CHECK_DAYS` | `7`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("MOSTRADOR_DB_PATH").unwrap_or_else(|| "mostrador.db".to_string());

        let max_connections: u32 = parse_or("MOSTRADOR_MAX_CONNECTIONS", &lookup, 5)?;
        let busy_timeout_secs: u64 = parse_or("MOSTRADOR_BUSY_TIMEOUT_SECS", &lookup, 5)?;
        let register_attempts: u32 =
            parse_or("MOSTRADOR_REGISTER_ATTEMPTS", &lookup, DEFAULT_REGISTER_ATTEMPTS)?;
        let upcoming_check_days: i64 = parse_or(
            "MOSTRADOR_UPCOMING_CHECK_DAYS",
            &lookup,
            DEFAULT_UPCOMING_CHECK_DAYS,
        )?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("MOSTRADOR_MAX_CONNECTIONS".to_string()));
        }
        if register_attempts == 0 {
            return Err(ConfigError::InvalidValue("MOSTRADOR_REGISTER_ATTEMPTS".to_string()));
        }
        if !(0..=MAX_UPCOMING_CHECK_DAYS).contains(&upcoming_check_days) {
            return Err(ConfigError::InvalidValue(
                "MOSTRADOR_UPCOMING_CHECK_DAYS".to_string(),
            ));
        }

        Ok(LedgerConfig {
            db: DbConfig::new(PathBuf::from(path))
                .max_connections(max_connections)
                .busy_timeout(Duration::from_secs(busy_timeout_secs)),
            register_attempts,
            upcoming_check_days,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db.database_path, PathBuf::from("mostrador.db"));
        assert_eq!(config.db.max_connections, 5);
        assert_eq!(config.register_attempts, 3);
        assert_eq!(config.upcoming_check_days, 7);
    }

    #[test]
    fn test_overrides() {
        let config = LedgerConfig::from_lookup(lookup(&[
            ("MOSTRADOR_DB_PATH", "/var/lib/mostrador/ledger.db"),
            ("MOSTRADOR_MAX_CONNECTIONS", "8"),
            ("MOSTRADOR_BUSY_TIMEOUT_SECS", "12"),
            ("MOSTRADOR_REGISTER_ATTEMPTS", "5"),
            ("MOSTRADOR_UPCOMING_CHECK_DAYS", "15"),
        ]))
        .unwrap();

        assert_eq!(
            config.db.database_path,
            PathBuf::from("/var/lib/mostrador/ledger.db")
        );
        assert_eq!(config.db.max_connections, 8);
        assert_eq!(config.db.busy_timeout, Duration::from_secs(12));
        assert_eq!(config.register_attempts, 5);
        assert_eq!(config.upcoming_check_days, 15);
    }

    #[test]
    fn test_invalid_values() {
        let err = LedgerConfig::from_lookup(lookup(&[("MOSTRADOR_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MOSTRADOR_MAX_CONNECTIONS");

        assert!(
            LedgerConfig::from_lookup(lookup(&[("MOSTRADOR_REGISTER_ATTEMPTS", "0")])).is_err()
        );
        assert!(
            LedgerConfig::from_lookup(lookup(&[("MOSTRADOR_UPCOMING_CHECK_DAYS", "-1")])).is_err()
        );
    }

    #[test]
    fn test_upcoming_check_days_upper_bound() {
        let at_limit = LedgerConfig::from_lookup(lookup(&[("MOSTRADOR_UPCOMING_CHECK_DAYS", "3660")]))
            .unwrap();
        assert_eq!(at_limit.upcoming_check_days, MAX_UPCOMING_CHECK_DAYS);

        let err = LedgerConfig::from_lookup(lookup(&[(
            "MOSTRADOR_UPCOMING_CHECK_DAYS",
            "200000000",
        )]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MOSTRADOR_UPCOMING_CHECK_DAYS");
    }
}
