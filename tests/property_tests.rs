//! Property-based tests for the significance evaluator
//!
//! - Test mathematical invariants of the chi-squared survival p-value
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use proptest::prelude::*;
use triangler::significance::{Outcome, SampleSet, SignificanceEvaluator};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a sample set of up to `max` outcomes
fn arb_sample_set(max: usize) -> impl Strategy<Value = SampleSet> {
    proptest::collection::vec(any::<bool>(), 0..=max)
        .prop_map(|flags| flags.into_iter().collect::<SampleSet>())
}

/// Generate (n, correct_a, correct_b) where correct_b deviates strictly more
/// from n/3 than correct_a
fn arb_deviation_pair() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..=40)
        .prop_flat_map(|n| (Just(n), 0..=n, 0..=n))
        .prop_filter("deviations must differ", |(n, a, b)| {
            deviation(*n, *a) != deviation(*n, *b)
        })
        .prop_map(|(n, a, b)| {
            if deviation(n, a) < deviation(n, b) {
                (n, a, b)
            } else {
                (n, b, a)
            }
        })
}

/// |3 * correct - n|, i.e. three times the distance from n/3
fn deviation(n: usize, correct: usize) -> usize {
    (3 * correct).abs_diff(n)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: p-value always lies in [0, 1] and sample size is the count
    #[test]
    fn prop_p_value_in_unit_interval(outcomes in arb_sample_set(200)) {
        let result = SignificanceEvaluator::new().evaluate(&outcomes);
        prop_assert_eq!(result.sample_size, outcomes.len());
        prop_assert!((0.0..=1.0).contains(&result.p_value));
        prop_assert!(result.chi_squared >= 0.0);
    }

    /// Property: evaluation is pure
    #[test]
    fn prop_evaluation_idempotent(outcomes in arb_sample_set(100)) {
        let evaluator = SignificanceEvaluator::new();
        let first = evaluator.evaluate(&outcomes);
        let second = evaluator.evaluate(&outcomes);
        prop_assert_eq!(first, second);
    }

    /// Property: order of outcomes does not matter
    #[test]
    fn prop_order_independent(outcomes in arb_sample_set(100)) {
        let evaluator = SignificanceEvaluator::new();
        let reversed: SampleSet = outcomes.iter().rev().copied().collect();
        prop_assert_eq!(evaluator.evaluate(&outcomes), evaluator.evaluate(&reversed));
    }

    /// Property: with n fixed, a larger deviation from n/3 gives a strictly
    /// smaller p-value
    #[test]
    fn prop_p_value_decreases_with_deviation((n, closer, farther) in arb_deviation_pair()) {
        let evaluator = SignificanceEvaluator::new();
        let near = evaluator.evaluate_counts(n, closer);
        let far = evaluator.evaluate_counts(n, farther);
        prop_assert!(far.chi_squared > near.chi_squared);
        prop_assert!(
            far.p_value < near.p_value,
            "n={} closer={} (p={}) farther={} (p={})",
            n, closer, near.p_value, farther, far.p_value
        );
    }

    /// Property: counts and outcome sets agree
    #[test]
    fn prop_counts_match_outcomes(correct in 0usize..50, incorrect in 0usize..50) {
        let evaluator = SignificanceEvaluator::new();
        let from_counts = evaluator.evaluate_counts(correct + incorrect, correct);
        let from_set = evaluator.evaluate(&SampleSet::from_counts(correct, incorrect));
        prop_assert_eq!(from_counts, from_set);
    }
}

// ============================================================================
// Boundary cases
// ============================================================================

#[test]
fn test_empty_set_has_no_evidence() {
    let result = SignificanceEvaluator::new().evaluate(&SampleSet::new());
    assert_eq!(result.sample_size, 0);
    assert!((result.p_value - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_single_outcome_is_finite() {
    let evaluator = SignificanceEvaluator::new();
    for outcome in [Outcome::new(false), Outcome::new(true)] {
        let set: SampleSet = std::iter::once(outcome).collect();
        let result = evaluator.evaluate(&set);
        assert_eq!(result.sample_size, 1);
        assert!(result.p_value.is_finite());
        assert!((0.0..=1.0).contains(&result.p_value));
    }
}

#[test]
fn test_nine_correct_is_significant() {
    let result = SignificanceEvaluator::new().evaluate(&SampleSet::from_counts(9, 0));
    assert!(result.p_value < 0.01);
}
