//! Runtime configuration
//!
//! Read from the process environment with defaults for every value, so an
//! empty environment yields a working (development) configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for Triangler.
///
/// # Example
/// ```
/// use triangler::config::TrianglerConfig;
///
/// let config = TrianglerConfig::default();
/// assert_eq!(config.token_length, 6);
/// assert_eq!(config.token_expiry_days, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrianglerConfig {
    /// Verbose logging (env `DEBUG`)
    pub debug: bool,

    /// Production deployment (env `IS_PROD`)
    pub is_prod: bool,

    /// Public host name used when printing flight cards (env `HOST_NAME`)
    pub host_name: String,

    /// Characters per sample flight token (env `TRIANGLER_TOKEN_LENGTH`)
    ///
    /// Six uppercase alphanumerics give ~2.2 billion codes, plenty for
    /// hand-typed tokens.
    pub token_length: usize,

    /// Days a token accepts responses (env `TRIANGLER_TOKEN_EXPIRY_DAYS`)
    pub token_expiry_days: i64,

    /// PBKDF2 rounds for password hashing (env `TRIANGLER_HASH_ITERATIONS`)
    pub hash_iterations: u32,

    /// Random bytes per password salt (env `TRIANGLER_SALT_BYTES`)
    pub salt_bytes: usize,
}

impl Default for TrianglerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            is_prod: false,
            host_name: "triangler.example.com".to_string(),
            token_length: 6,
            token_expiry_days: 7,
            hash_iterations: 100_000,
            salt_bytes: 32,
        }
    }
}

impl TrianglerConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is set but unparseable or out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is set but unparseable or out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            debug: lookup("DEBUG").map_or(defaults.debug, |v| parse_bool(&v)),
            is_prod: lookup("IS_PROD").map_or(defaults.is_prod, |v| parse_bool(&v)),
            host_name: lookup("HOST_NAME").unwrap_or(defaults.host_name),
            token_length: parse_var(&lookup, "TRIANGLER_TOKEN_LENGTH", defaults.token_length)?,
            token_expiry_days: parse_var(
                &lookup,
                "TRIANGLER_TOKEN_EXPIRY_DAYS",
                defaults.token_expiry_days,
            )?,
            hash_iterations: parse_var(
                &lookup,
                "TRIANGLER_HASH_ITERATIONS",
                defaults.hash_iterations,
            )?,
            salt_bytes: parse_var(&lookup, "TRIANGLER_SALT_BYTES", defaults.salt_bytes)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.token_length == 0 {
            return Err(Error::Config("token_length must be at least 1".to_string()));
        }
        if self.token_expiry_days < 1 {
            return Err(Error::Config(
                "token_expiry_days must be at least 1".to_string(),
            ));
        }
        if self.hash_iterations == 0 {
            return Err(Error::Config(
                "hash_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Cheap hashing for tests (1 PBKDF2 round).
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            hash_iterations: 1,
            salt_bytes: 8,
            ..Self::default()
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "y" | "yes")
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| Error::Config(format!("{name}={raw:?}: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = TrianglerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TrianglerConfig::default());
    }

    #[test]
    fn test_bool_parsing() {
        for yes in ["true", "Y", "yes", "TRUE"] {
            let config = TrianglerConfig::from_lookup(lookup_from(&[("DEBUG", yes)])).unwrap();
            assert!(config.debug, "{yes} should enable debug");
        }
        let config =
            TrianglerConfig::from_lookup(lookup_from(&[("IS_PROD", "1")])).unwrap();
        assert!(!config.is_prod);
    }

    #[test]
    fn test_numeric_overrides() {
        let config = TrianglerConfig::from_lookup(lookup_from(&[
            ("TRIANGLER_TOKEN_LENGTH", "8"),
            ("TRIANGLER_TOKEN_EXPIRY_DAYS", " 14 "),
            ("HOST_NAME", "tasting.local"),
        ]))
        .unwrap();

        assert_eq!(config.token_length, 8);
        assert_eq!(config.token_expiry_days, 14);
        assert_eq!(config.host_name, "tasting.local");
    }

    #[test]
    fn test_unparseable_value_is_config_error() {
        let err = TrianglerConfig::from_lookup(lookup_from(&[("TRIANGLER_TOKEN_LENGTH", "six")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("TRIANGLER_TOKEN_LENGTH")));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(
            TrianglerConfig::from_lookup(lookup_from(&[("TRIANGLER_TOKEN_LENGTH", "0")])).is_err()
        );
        assert!(
            TrianglerConfig::from_lookup(lookup_from(&[("TRIANGLER_TOKEN_EXPIRY_DAYS", "0")]))
                .is_err()
        );
    }
}
