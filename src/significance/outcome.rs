//! Choices, outcomes and sample sets

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the three labelled samples served in a triangle test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    /// Sample labelled "A"
    A,
    /// Sample labelled "B"
    B,
    /// Sample labelled "C"
    C,
}

impl Choice {
    /// Every label, in display order.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Pick a label uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// The single-letter label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(Error::Validation(format!(
                "'{other}' is not a sample label (expected A, B or C)"
            ))),
        }
    }
}

/// Whether one sample flight was answered correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    is_correct: bool,
}

impl Outcome {
    /// Outcome with a known correctness.
    #[must_use]
    pub const fn new(is_correct: bool) -> Self {
        Self { is_correct }
    }

    /// Compare what was chosen against the correct sample.
    ///
    /// A flight nobody answered yet (`chosen == None`) counts as incorrect.
    #[must_use]
    pub fn from_choices(correct: Choice, chosen: Option<Choice>) -> Self {
        Self::new(chosen == Some(correct))
    }

    /// Was the odd sample identified?
    #[must_use]
    pub const fn is_correct(self) -> bool {
        self.is_correct
    }
}

impl From<bool> for Outcome {
    fn from(is_correct: bool) -> Self {
        Self::new(is_correct)
    }
}

/// Outcomes of every sample flight in one experiment.
///
/// Assembled on demand from stored flights and responses; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    outcomes: Vec<Outcome>,
}

impl SampleSet {
    /// Create an empty sample set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample set with `correct` correct outcomes followed by `incorrect` incorrect ones.
    #[must_use]
    pub fn from_counts(correct: usize, incorrect: usize) -> Self {
        std::iter::repeat(Outcome::new(true))
            .take(correct)
            .chain(std::iter::repeat(Outcome::new(false)).take(incorrect))
            .collect()
    }

    /// Append one outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Number of outcomes (the sample size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if no outcome has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of correct outcomes.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct()).count()
    }

    /// Number of incorrect outcomes.
    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.len() - self.correct_count()
    }

    /// Iterate over the outcomes.
    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }
}

impl FromIterator<Outcome> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<bool> for SampleSet {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        iter.into_iter().map(Outcome::from).collect()
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl Extend<Outcome> for SampleSet {
    fn extend<I: IntoIterator<Item = Outcome>>(&mut self, iter: I) {
        self.outcomes.extend(iter);
    }
}
