//! Experiment Report - experiment fields plus significance

use serde::Serialize;

use super::Experiment;
use crate::significance::Significance;

/// An experiment as presented to clients: the stored fields plus the sample
/// size and p-value computed from its current flights.
///
/// Serializes flat:
///
/// ```text
/// { "id", "created_at", "updated_at", "name", "description",
///   "start_on", "end_on", "sample_size", "p_value" }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExperimentReport {
    #[serde(flatten)]
    experiment: Experiment,
    sample_size: usize,
    p_value: f64,
}

impl ExperimentReport {
    /// Combine an experiment with its evaluated significance.
    #[must_use]
    pub fn new(experiment: Experiment, significance: &Significance) -> Self {
        Self {
            experiment,
            sample_size: significance.sample_size,
            p_value: significance.p_value,
        }
    }

    /// Get the experiment.
    #[must_use]
    pub const fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    /// Get the number of sample flights.
    #[must_use]
    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Get the p-value against random guessing.
    #[must_use]
    pub const fn p_value(&self) -> f64 {
        self.p_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::ExperimentRecord;
    use crate::table::Entity;
    use chrono::NaiveDate;

    #[test]
    fn test_report_json_shape() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let experiment = Entity::new(
            3,
            ExperimentRecord::new("Cold brew", "grind size", day, day).unwrap(),
        );
        let significance = Significance {
            sample_size: 9,
            chi_squared: 18.0,
            p_value: 0.000_02,
        };

        let json = serde_json::to_value(ExperimentReport::new(experiment, &significance)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Cold brew");
        assert_eq!(json["start_on"], "2024-05-01");
        assert_eq!(json["sample_size"], 9);
        assert_eq!(json["p_value"], 0.000_02);
        assert!(json.get("chi_squared").is_none());
        assert!(json.get("created_at").is_some());
    }
}
