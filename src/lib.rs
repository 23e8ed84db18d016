//! # Triangler: Triangle-Test Experiment Backend
//!
//! **Version**: 0.1.0
//!
//! Triangler manages triangle tests: a taster receives three samples, two of
//! which are identical, and has to pick the odd one out. Experiments collect
//! many such sample flights; the significance of the results is a
//! chi-squared goodness-of-fit test against guessing (1 in 3 correct).
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke safety**: Unique tokens and one response per flight are
//!   enforced atomically by the store
//! - **Jidoka**: Statistical properties are checked with property tests
//! - **Genchi Genbutsu**: The p-value is recomputed from stored outcomes on
//!   every request, never cached
//!
//! ## Example Usage
//!
//! ```rust
//! use triangler::significance::{SampleSet, SignificanceEvaluator};
//!
//! // 9 tasters, all picked the odd sample
//! let outcomes = SampleSet::from_counts(9, 0);
//! let significance = SignificanceEvaluator::new().evaluate(&outcomes);
//!
//! assert_eq!(significance.sample_size, 9);
//! assert!(significance.p_value < 0.01);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod auth;
pub mod config;
pub mod error;
pub mod experiment;
pub mod service;
pub mod significance;
pub mod table;
pub mod telemetry;

pub use error::{Error, Result};
pub use service::{ActionOutcome, Triangler, TrianglerBuilder};
