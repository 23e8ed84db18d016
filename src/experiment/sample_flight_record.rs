//! Sample Flight Record - one served triangle of samples

use serde::{Deserialize, Serialize};

use crate::significance::{Choice, Outcome};

/// Sample Flight Record represents one trial of an experiment.
///
/// A flight is three cups labelled A, B and C; `correct_sample` is the odd
/// one out. Each flight receives at most one response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleFlightRecord {
    experiment_id: u64,
    correct_sample: Choice,
}

impl SampleFlightRecord {
    /// Create a new sample flight record.
    ///
    /// # Arguments
    ///
    /// * `experiment_id` - ID of the parent experiment
    /// * `correct_sample` - Label of the odd sample
    #[must_use]
    pub const fn new(experiment_id: u64, correct_sample: Choice) -> Self {
        Self {
            experiment_id,
            correct_sample,
        }
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub const fn experiment_id(&self) -> u64 {
        self.experiment_id
    }

    /// Get the label of the odd sample.
    #[must_use]
    pub const fn correct_sample(&self) -> Choice {
        self.correct_sample
    }

    /// Score a response (or its absence) against this flight.
    #[must_use]
    pub fn outcome(&self, chosen: Option<Choice>) -> Outcome {
        Outcome::from_choices(self.correct_sample, chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_flight_outcome() {
        let flight = SampleFlightRecord::new(1, Choice::B);
        assert!(flight.outcome(Some(Choice::B)).is_correct());
        assert!(!flight.outcome(Some(Choice::C)).is_correct());
        assert!(!flight.outcome(None).is_correct());
    }
}
