//! Chi-squared goodness-of-fit against random guessing

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::SampleSet;

/// Samples served per flight; a guess is correct with probability `1 / CHOICE_COUNT`.
pub const CHOICE_COUNT: f64 = 3.0;

/// Correct vs incorrect collapses to two categories.
pub const DEGREES_OF_FREEDOM: f64 = 1.0;

/// Result of testing a sample set against the random-guess hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    /// Number of sample flights considered
    pub sample_size: usize,
    /// Pearson chi-squared statistic (0.0 for an empty set)
    pub chi_squared: f64,
    /// Probability of a deviation at least this large under random guessing
    pub p_value: f64,
}

impl Significance {
    /// Result for a set with no evidence at all.
    #[must_use]
    pub const fn no_evidence(sample_size: usize) -> Self {
        Self {
            sample_size,
            chi_squared: 0.0,
            p_value: 1.0,
        }
    }

    /// Is the p-value below `alpha`?
    #[must_use]
    pub fn is_significant_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Tests whether tasters pick the odd sample more (or less) often than chance.
///
/// Null hypothesis: every response is a uniform guess among three samples, so
/// one third of flights are expected to be correct. The statistic is the
/// Pearson chi-squared over the two categories (correct, incorrect) with one
/// degree of freedom, and the p-value is its survival function.
///
/// # Example
///
/// ```rust
/// use triangler::significance::{SampleSet, SignificanceEvaluator};
///
/// let evaluator = SignificanceEvaluator::new();
///
/// // Every taster found the odd sample
/// let result = evaluator.evaluate(&SampleSet::from_counts(9, 0));
/// assert_eq!(result.sample_size, 9);
/// assert!(result.p_value < 0.01);
///
/// // Exactly what chance predicts
/// let result = evaluator.evaluate(&SampleSet::from_counts(1, 2));
/// assert_eq!(result.p_value, 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignificanceEvaluator {
    _private: (),
}

impl SignificanceEvaluator {
    /// Create a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Evaluate a sample set.
    ///
    /// Total over all inputs: an empty set yields `p_value == 1.0`.
    #[must_use]
    pub fn evaluate(&self, outcomes: &SampleSet) -> Significance {
        self.evaluate_counts(outcomes.len(), outcomes.correct_count())
    }

    /// Evaluate from raw counts.
    ///
    /// `observed_correct` is capped at `sample_size`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate_counts(&self, sample_size: usize, observed_correct: usize) -> Significance {
        if sample_size < 1 {
            return Significance::no_evidence(sample_size);
        }

        let n = sample_size as f64;
        let expected_correct = n / CHOICE_COUNT;
        let expected_incorrect = expected_correct * 2.0;

        let observed_correct = observed_correct.min(sample_size) as f64;
        let observed_incorrect = n - observed_correct;

        let chi_squared = (observed_correct - expected_correct).powi(2) / expected_correct
            + (observed_incorrect - expected_incorrect).powi(2) / expected_incorrect;
        let p_value = chi_squared_survival(chi_squared, DEGREES_OF_FREEDOM);

        tracing::debug!(
            sample_size,
            observed_correct,
            chi_squared,
            p_value,
            "evaluated sample set"
        );

        Significance {
            sample_size,
            chi_squared,
            p_value,
        }
    }
}

/// Survival function (1 - CDF) of the chi-squared distribution.
///
/// A non-positive `dof` has no distribution and yields 1.0.
fn chi_squared_survival(x: f64, dof: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }
    ChiSquared::new(dof)
        .map_or(1.0, |distribution| distribution.sf(x))
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_evidence() {
        let result = SignificanceEvaluator::new().evaluate(&SampleSet::new());
        assert_eq!(result.sample_size, 0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.chi_squared, 0.0);
    }

    #[test]
    fn test_all_correct_statistic() {
        // n = 9: expected 3 correct / 6 incorrect, chi2 = 36/3 + 36/6 = 18
        let result = SignificanceEvaluator::new().evaluate(&SampleSet::from_counts(9, 0));
        assert!((result.chi_squared - 18.0).abs() < 1e-9);
        assert!(result.p_value < 0.01);
        assert!(result.p_value > 0.0);
    }

    #[test]
    fn test_chance_ratio_is_perfect_fit() {
        let result = SignificanceEvaluator::new().evaluate(&SampleSet::from_counts(1, 2));
        assert_eq!(result.chi_squared, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_known_critical_value() {
        // P(X > 3.841) = 0.05 for one degree of freedom
        assert!((chi_squared_survival(3.841_458_820_694_124, 1.0) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_survival_function_bounds() {
        assert_eq!(chi_squared_survival(0.0, 1.0), 1.0);
        assert_eq!(chi_squared_survival(f64::NAN, 1.0), 1.0);
        assert_eq!(chi_squared_survival(f64::INFINITY, 1.0), 0.0);
        assert_eq!(chi_squared_survival(2.0, 0.0), 1.0);
        // P(X > 6.635) = 0.01 for one degree of freedom
        assert!((chi_squared_survival(6.634_896_601_021_214, 1.0) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_single_incorrect_flight() {
        let result = SignificanceEvaluator::new().evaluate(&SampleSet::from_counts(0, 1));
        // (1/3)^2 / (1/3) + (1/3)^2 / (2/3) = 0.5
        assert!((result.chi_squared - 0.5).abs() < 1e-12);
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
    }

    #[test]
    fn test_counts_are_capped() {
        let evaluator = SignificanceEvaluator::new();
        assert_eq!(
            evaluator.evaluate_counts(3, 10),
            evaluator.evaluate_counts(3, 3)
        );
    }

    #[test]
    fn test_is_significant_at() {
        let evaluator = SignificanceEvaluator::new();
        assert!(evaluator.evaluate_counts(9, 9).is_significant_at(0.05));
        assert!(!evaluator.evaluate_counts(3, 1).is_significant_at(0.05));
    }
}
