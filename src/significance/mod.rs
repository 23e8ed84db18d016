//! Triangle-test significance
//!
//! A triangle test serves three samples (A, B, C), two of them identical, and
//! asks the taster to pick the odd one out. If the samples are truly
//! indistinguishable, tasters guess and one third of the flights come back
//! correct. [`SignificanceEvaluator`] reports how far an experiment's results
//! stray from that.
//!
//! ```text
//! SampleFlight.correct_sample ─┐
//!                              ├─> Outcome ──< SampleSet ──> Significance
//! Response.chosen ─────────────┘                              (n, chi², p)
//! ```

mod evaluator;
mod outcome;

pub use evaluator::{Significance, SignificanceEvaluator, CHOICE_COUNT, DEGREES_OF_FREEDOM};
pub use outcome::{Choice, Outcome, SampleSet};
