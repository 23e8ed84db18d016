//! Experiment Record - root entity for triangle-test tracking

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Experiment Record represents a tracked triangle test.
///
/// This is the root entity in the schema. Each experiment has many sample
/// flights and runs between two calendar dates (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRecord {
    name: String,
    description: String,
    start_on: NaiveDate,
    end_on: NaiveDate,
}

impl ExperimentRecord {
    /// Create a new experiment record.
    ///
    /// # Arguments
    ///
    /// * `name` - Human-readable name for the experiment
    /// * `description` - What is being compared
    /// * `start_on` - First day of the experiment
    /// * `end_on` - Last day of the experiment
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDateRange` if `start_on > end_on`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start_on: NaiveDate,
        end_on: NaiveDate,
    ) -> Result<Self> {
        ensure_valid_range(start_on, end_on)?;
        Ok(Self {
            name: name.into(),
            description: description.into(),
            start_on,
            end_on,
        })
    }

    /// Create a builder for constructing an experiment record with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(name)
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the experiment description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the first day of the experiment.
    #[must_use]
    pub const fn start_on(&self) -> NaiveDate {
        self.start_on
    }

    /// Get the last day of the experiment.
    #[must_use]
    pub const fn end_on(&self) -> NaiveDate {
        self.end_on
    }

    /// Does the experiment run on `day`?
    #[must_use]
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_on <= day && day <= self.end_on
    }

    /// Apply a partial update, returning the merged record.
    ///
    /// Only fields present in `update` change. The merged date range is
    /// validated as a whole.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDateRange` if the merged range is inverted.
    pub fn apply(&self, update: ExperimentUpdate) -> Result<Self> {
        Self::new(
            update.name.unwrap_or_else(|| self.name.clone()),
            update
                .description
                .unwrap_or_else(|| self.description.clone()),
            update.start_on.unwrap_or(self.start_on),
            update.end_on.unwrap_or(self.end_on),
        )
    }
}

/// Builder for `ExperimentRecord`.
///
/// Without an explicit schedule the experiment runs for a single day, today.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    name: String,
    description: String,
    schedule: Option<(NaiveDate, NaiveDate)>,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the first and last day of the experiment.
    #[must_use]
    pub const fn schedule(mut self, start_on: NaiveDate, end_on: NaiveDate) -> Self {
        self.schedule = Some((start_on, end_on));
        self
    }

    /// Build the `ExperimentRecord`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDateRange` if the schedule is inverted.
    pub fn build(self) -> Result<ExperimentRecord> {
        let (start_on, end_on) = self.schedule.unwrap_or_else(|| {
            let today = chrono::Utc::now().date_naive();
            (today, today)
        });
        ExperimentRecord::new(self.name, self.description, start_on, end_on)
    }
}

/// Payload for creating an experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewExperiment {
    /// Human-readable name
    pub name: String,
    /// What is being compared
    pub description: String,
    /// First day of the experiment
    pub start_on: NaiveDate,
    /// Last day of the experiment
    pub end_on: NaiveDate,
}

impl NewExperiment {
    /// Check the payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDateRange` if `start_on > end_on`.
    pub fn validate(&self) -> Result<()> {
        ensure_valid_range(self.start_on, self.end_on)
    }
}

impl TryFrom<NewExperiment> for ExperimentRecord {
    type Error = Error;

    fn try_from(payload: NewExperiment) -> Result<Self> {
        Self::new(
            payload.name,
            payload.description,
            payload.start_on,
            payload.end_on,
        )
    }
}

/// Partial update for an experiment. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New first day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_on: Option<NaiveDate>,
    /// New last day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_on: Option<NaiveDate>,
}

impl ExperimentUpdate {
    /// Update that only renames.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Check if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_on.is_none()
            && self.end_on.is_none()
    }
}

fn ensure_valid_range(start_on: NaiveDate, end_on: NaiveDate) -> Result<()> {
    if start_on > end_on {
        return Err(Error::InvalidDateRange { start_on, end_on });
    }
    Ok(())
}
