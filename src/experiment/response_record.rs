//! Response Record - a taster's answer to a sample flight

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::significance::Choice;

/// Self-reported tasting experience of the respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// Little or no tasting experience.
    Novice,
    /// Regular taster.
    Intermediate,
    /// Trained or professional taster.
    Expert,
}

/// Response Record stores which sample a taster picked as the odd one out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRecord {
    experiment_id: u64,
    sample_flight_id: u64,
    chosen: Choice,
    experience_level: ExperienceLevel,
    responded_at: DateTime<Utc>,
}

impl ResponseRecord {
    /// Create a new response record with the current timestamp.
    ///
    /// # Arguments
    ///
    /// * `experiment_id` - ID of the experiment the flight belongs to
    /// * `sample_flight_id` - ID of the answered flight
    /// * `chosen` - Label the taster picked
    /// * `experience_level` - Respondent's experience
    #[must_use]
    pub fn new(
        experiment_id: u64,
        sample_flight_id: u64,
        chosen: Choice,
        experience_level: ExperienceLevel,
    ) -> Self {
        Self {
            experiment_id,
            sample_flight_id,
            chosen,
            experience_level,
            responded_at: Utc::now(),
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub const fn experiment_id(&self) -> u64 {
        self.experiment_id
    }

    /// Get the answered flight ID.
    #[must_use]
    pub const fn sample_flight_id(&self) -> u64 {
        self.sample_flight_id
    }

    /// Get the label the taster picked.
    #[must_use]
    pub const fn chosen(&self) -> Choice {
        self.chosen
    }

    /// Get the respondent's experience level.
    #[must_use]
    pub const fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }

    /// Get the response timestamp.
    #[must_use]
    pub const fn responded_at(&self) -> DateTime<Utc> {
        self.responded_at
    }
}
