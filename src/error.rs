//! Error types for Triangler
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Triangler error types
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup by id (or natural key) found nothing
    #[error("{entity} with id {id} not found.")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Id or natural key used for the lookup
        id: String,
    },

    /// Unique key collision
    #[error("{entity} '{key}' already exists")]
    AlreadyExists {
        /// Kind of entity being created
        entity: &'static str,
        /// Offending key
        key: String,
    },

    /// Experiment schedule ends before it starts
    #[error("Start date must be before or equal to end date. (start_on: {start_on}, end_on: {end_on})")]
    InvalidDateRange {
        /// Requested start date
        start_on: NaiveDate,
        /// Requested end date
        end_on: NaiveDate,
    },

    /// Input failed a domain rule
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credentials could not be verified
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Caller lacks a required scope
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Sample flight token is unknown
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Sample flight token is past its expiry date
    #[error("Token '{token}' expired at {expired_at}\nRefresh the token to accept new responses")]
    TokenExpired {
        /// Expired token
        token: String,
        /// Expiry instant
        expired_at: DateTime<Utc>,
    },

    /// Could not draw a token that is not already in use
    #[error("No unique token found after {attempts} attempts\nIncrease TRIANGLER_TOKEN_LENGTH")]
    TokenSpaceExhausted {
        /// Number of draws made
        attempts: usize,
    },

    /// Configuration value could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a `NotFound` error for `entity` keyed by `id`.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Build an `AlreadyExists` error for `entity` keyed by `key`.
    pub fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.into(),
        }
    }
}
