//! Triangle-Test Schema
//!
//! This module provides the data structures for tracking triangle tests:
//! experiments, the sample flights served in them, the tokens tasters use
//! to answer, and the responses themselves.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< SampleFlightRecord (N)
//!                              │
//!                              ├── SampleFlightToken (1) [short code]
//!                              └── ResponseRecord (0..1)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use triangler::experiment::{ExperienceLevel, ExperimentRecord, ExperimentStore, ResponseRecord, SampleFlightRecord};
//! use triangler::significance::{Choice, SignificanceEvaluator};
//! use triangler::table::Table;
//!
//! # fn example() -> triangler::Result<()> {
//! let store = ExperimentStore::new();
//!
//! // Create an experiment
//! let experiment = store.experiments().insert(ExperimentRecord::builder("Dry hop").build()?)?;
//!
//! // Serve a flight, the odd sample is B
//! let flight = store
//!     .sample_flights()
//!     .insert(SampleFlightRecord::new(experiment.id(), Choice::B))?;
//!
//! // The taster picks B
//! store.insert_response(ResponseRecord::new(
//!     experiment.id(),
//!     flight.id(),
//!     Choice::B,
//!     ExperienceLevel::Novice,
//! ))?;
//!
//! let significance = SignificanceEvaluator::new().evaluate(&store.sample_set(experiment.id())?);
//! assert_eq!(significance.sample_size, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod experiment_record;
mod observation;
mod report;
mod response_record;
mod sample_flight_record;
mod store;
mod token_record;

pub use experiment_record::{
    ExperimentRecord, ExperimentRecordBuilder, ExperimentUpdate, NewExperiment,
};
pub use observation::Observation;
pub use report::ExperimentReport;
pub use response_record::{ExperienceLevel, ResponseRecord};
pub use sample_flight_record::SampleFlightRecord;
pub use store::ExperimentStore;
pub use token_record::{expiry_from, generate_token, SampleFlightToken};

use crate::table::Entity;

/// A stored experiment.
pub type Experiment = Entity<ExperimentRecord>;

/// A stored sample flight.
pub type SampleFlight = Entity<SampleFlightRecord>;

/// A stored response.
pub type Response = Entity<ResponseRecord>;

/// A stored sample flight token.
pub type FlightToken = Entity<SampleFlightToken>;
