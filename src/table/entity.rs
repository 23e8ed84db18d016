//! Stored row: id and timestamps around a record

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A record as stored in a [`Table`](super::Table).
///
/// Serializes flat: `id`, `created_at` and `updated_at` sit beside the
/// record's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity<T> {
    id: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    record: T,
}

impl<T> Entity<T> {
    /// Wrap a freshly inserted record.
    #[must_use]
    pub fn new(id: u64, record: T) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            record,
        }
    }

    /// Get the primary key.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the last-modified timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Get the wrapped record.
    #[must_use]
    pub const fn record(&self) -> &T {
        &self.record
    }

    /// Unwrap the record, dropping id and timestamps.
    #[must_use]
    pub fn into_record(self) -> T {
        self.record
    }

    /// Replace the record, keeping id and `created_at`.
    ///
    /// Returns the previous record.
    pub fn replace(&mut self, record: T) -> T {
        self.updated_at = Utc::now().max(self.created_at);
        std::mem::replace(&mut self.record, record)
    }

    /// Check that the entity was not modified before it was created.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `created_at > updated_at`.
    pub fn validate(&self) -> Result<()> {
        if self.created_at > self.updated_at {
            return Err(Error::Validation(
                "Update date must be greater than or equal to create date.".to_string(),
            ));
        }
        Ok(())
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}
