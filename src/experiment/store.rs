//! Experiment Store - in-memory storage for triangle-test data
//!
//! This module provides the storage layer: one table per record kind plus
//! the relational queries the services need.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use super::{
    Experiment, ExperimentRecord, FlightToken, Observation, Response, ResponseRecord,
    SampleFlight, SampleFlightRecord, SampleFlightToken,
};
use crate::significance::{Outcome, SampleSet};
use crate::table::{MemoryTable, Table};
use crate::Result;

/// In-memory store for experiments, sample flights, tokens and responses.
///
/// ## Design
///
/// Each record kind lives in its own [`MemoryTable`]. Two unique indexes are
/// kept beside the tables and reserved atomically through the `DashMap`
/// entry API:
///
/// - token code -> token id (codes are unique)
/// - sample flight id -> response id (one response per flight)
///
/// ## Cascades
///
/// Deleting an experiment removes its flights; deleting a flight removes its
/// token and response.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: MemoryTable<ExperimentRecord>,
    sample_flights: MemoryTable<SampleFlightRecord>,
    responses: MemoryTable<ResponseRecord>,
    tokens: MemoryTable<SampleFlightToken>,
    token_codes: DashMap<String, u64, FxBuildHasher>,
    answered_flights: DashMap<u64, u64, FxBuildHasher>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store is empty (no experiments, flights, tokens or responses).
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.experiments.is_empty()?
            && self.sample_flights.is_empty()?
            && self.responses.is_empty()?
            && self.tokens.is_empty()?)
    }

    /// Experiment table.
    #[must_use]
    pub const fn experiments(&self) -> &MemoryTable<ExperimentRecord> {
        &self.experiments
    }

    /// Sample flight table.
    #[must_use]
    pub const fn sample_flights(&self) -> &MemoryTable<SampleFlightRecord> {
        &self.sample_flights
    }

    /// Response table.
    #[must_use]
    pub const fn responses(&self) -> &MemoryTable<ResponseRecord> {
        &self.responses
    }

    /// Token table.
    #[must_use]
    pub const fn tokens(&self) -> &MemoryTable<SampleFlightToken> {
        &self.tokens
    }

    /// Get all sample flights for an experiment, ordered by id.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn sample_flights_for_experiment(&self, experiment_id: u64) -> Result<Vec<SampleFlight>> {
        self.sample_flights
            .filter(|flight| flight.experiment_id() == experiment_id)
    }

    /// Store a token unless its code is already taken.
    ///
    /// Returns `None` on a code collision; nothing is stored then.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn insert_token(&self, token: SampleFlightToken) -> Result<Option<FlightToken>> {
        match self.token_codes.entry(token.token().to_string()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let stored = self.tokens.insert(token)?;
                slot.insert(stored.id());
                Ok(Some(stored))
            }
        }
    }

    /// Look a token up by its code.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn find_token(&self, code: &str) -> Result<Option<FlightToken>> {
        let Some(id) = self.token_codes.get(code).map(|id| *id) else {
            return Ok(None);
        };
        self.tokens.get(id)
    }

    /// Get the token issued for a flight.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn token_for_sample_flight(&self, sample_flight_id: u64) -> Result<Option<FlightToken>> {
        Ok(self
            .tokens
            .filter(|token| token.sample_flight_id() == sample_flight_id)?
            .into_iter()
            .next())
    }

    /// Store a response unless its flight has already been answered.
    ///
    /// Returns `None` if the flight already has a response.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn insert_response(&self, response: ResponseRecord) -> Result<Option<Response>> {
        match self.answered_flights.entry(response.sample_flight_id()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let stored = self.responses.insert(response)?;
                slot.insert(stored.id());
                Ok(Some(stored))
            }
        }
    }

    /// Get the response submitted for a flight.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn response_for_sample_flight(&self, sample_flight_id: u64) -> Result<Option<Response>> {
        let Some(id) = self.answered_flights.get(&sample_flight_id).map(|id| *id) else {
            return Ok(None);
        };
        self.responses.get(id)
    }

    /// Join a flight with its token and response.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn observation(&self, sample_flight: SampleFlight) -> Result<Observation> {
        let token = self.token_for_sample_flight(sample_flight.id())?;
        let response = self.response_for_sample_flight(sample_flight.id())?;
        Ok(Observation::new(sample_flight, token, response))
    }

    /// All observations of an experiment, ordered by flight id.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn observations_for_experiment(&self, experiment_id: u64) -> Result<Vec<Observation>> {
        self.sample_flights_for_experiment(experiment_id)?
            .into_iter()
            .map(|flight| self.observation(flight))
            .collect()
    }

    /// Assemble the sample set of an experiment: one outcome per flight,
    /// unanswered flights counting as incorrect.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn sample_set(&self, experiment_id: u64) -> Result<SampleSet> {
        self.sample_flights_for_experiment(experiment_id)?
            .into_iter()
            .map(|flight| {
                let chosen = self
                    .response_for_sample_flight(flight.id())?
                    .map(|response| response.chosen());
                Ok(flight.outcome(chosen))
            })
            .collect::<Result<Vec<Outcome>>>()
            .map(|outcomes| outcomes.into_iter().collect())
    }

    /// Delete a flight with its token and response.
    ///
    /// Token and response are removed even when the flight row is already
    /// gone, so a writer that raced a delete can clean up after itself.
    /// Returns whether the flight row existed.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn delete_sample_flight(&self, sample_flight_id: u64) -> Result<bool> {
        let existed = self.sample_flights.delete(sample_flight_id)?;
        if let Some(token) = self.token_for_sample_flight(sample_flight_id)? {
            self.token_codes.remove(token.token());
            self.tokens.delete(token.id())?;
        }
        if let Some((_, response_id)) = self.answered_flights.remove(&sample_flight_id) {
            self.responses.delete(response_id)?;
        }
        Ok(existed)
    }

    /// Delete an experiment with all of its flights.
    ///
    /// Returns whether the experiment existed.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn delete_experiment(&self, experiment_id: u64) -> Result<bool> {
        if !self.experiments.delete(experiment_id)? {
            return Ok(false);
        }
        for flight in self.sample_flights_for_experiment(experiment_id)? {
            self.delete_sample_flight(flight.id())?;
        }
        Ok(true)
    }

    /// Get an experiment by ID.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn get_experiment(&self, experiment_id: u64) -> Result<Option<Experiment>> {
        self.experiments.get(experiment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{expiry_from, ExperienceLevel};
    use crate::significance::Choice;
    use chrono::Utc;

    fn seed_experiment(store: &ExperimentStore) -> Experiment {
        store
            .experiments()
            .insert(ExperimentRecord::builder("Test").build().unwrap())
            .unwrap()
    }

    fn seed_flight(store: &ExperimentStore, experiment_id: u64, code: &str) -> SampleFlight {
        let flight = store
            .sample_flights()
            .insert(SampleFlightRecord::new(experiment_id, Choice::A))
            .unwrap();
        store
            .insert_token(SampleFlightToken::new(
                code,
                expiry_from(Utc::now(), 7),
                flight.id(),
            ))
            .unwrap()
            .unwrap();
        flight
    }

    #[test]
    fn test_store_default() {
        let store = ExperimentStore::new();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_store_add_and_get() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let flight = seed_flight(&store, experiment.id(), "AAA111");

        assert!(!store.is_empty().unwrap());
        assert!(store.get_experiment(experiment.id()).unwrap().is_some());
        assert_eq!(
            store.find_token("AAA111").unwrap().unwrap().sample_flight_id(),
            flight.id()
        );
        assert!(store.find_token("ZZZ999").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_token_code_rejected() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        seed_flight(&store, experiment.id(), "DUP000");

        let clash = SampleFlightToken::new("DUP000", Utc::now(), 99);
        assert!(store.insert_token(clash).unwrap().is_none());
        assert_eq!(store.tokens().len().unwrap(), 1);
    }

    #[test]
    fn test_one_response_per_flight() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let flight = seed_flight(&store, experiment.id(), "ONE111");

        let first = ResponseRecord::new(
            experiment.id(),
            flight.id(),
            Choice::A,
            ExperienceLevel::Novice,
        );
        assert!(store.insert_response(first.clone()).unwrap().is_some());
        assert!(store.insert_response(first).unwrap().is_none());
        assert_eq!(store.responses().len().unwrap(), 1);
    }

    #[test]
    fn test_sample_set_counts_unanswered_as_incorrect() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let answered = seed_flight(&store, experiment.id(), "ANS001");
        seed_flight(&store, experiment.id(), "ANS002");

        store
            .insert_response(ResponseRecord::new(
                experiment.id(),
                answered.id(),
                Choice::A,
                ExperienceLevel::Expert,
            ))
            .unwrap();

        let set = store.sample_set(experiment.id()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.correct_count(), 1);
    }

    #[test]
    fn test_delete_experiment_cascades() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let flight = seed_flight(&store, experiment.id(), "DEL001");
        store
            .insert_response(ResponseRecord::new(
                experiment.id(),
                flight.id(),
                Choice::B,
                ExperienceLevel::Intermediate,
            ))
            .unwrap();

        assert!(store.delete_experiment(experiment.id()).unwrap());

        assert!(store.is_empty().unwrap());
        assert!(store.find_token("DEL001").unwrap().is_none());
        assert!(!store.delete_experiment(experiment.id()).unwrap());
    }

    #[test]
    fn test_cleanup_after_flight_row_is_gone() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let flight = seed_flight(&store, experiment.id(), "LATE01");
        store
            .insert_response(ResponseRecord::new(
                experiment.id(),
                flight.id(),
                Choice::A,
                ExperienceLevel::Novice,
            ))
            .unwrap();

        // A concurrent cascade removed the row before token and response landed
        store.sample_flights().delete(flight.id()).unwrap();
        assert!(!store.delete_sample_flight(flight.id()).unwrap());

        assert!(store.find_token("LATE01").unwrap().is_none());
        assert!(store.response_for_sample_flight(flight.id()).unwrap().is_none());
        assert!(store.tokens().is_empty().unwrap());
        assert!(store.responses().is_empty().unwrap());
    }

    #[test]
    fn test_observations_ordering() {
        let store = ExperimentStore::new();
        let experiment = seed_experiment(&store);
        let first = seed_flight(&store, experiment.id(), "ORD001");
        let second = seed_flight(&store, experiment.id(), "ORD002");

        let observations = store.observations_for_experiment(experiment.id()).unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].sample_flight().id(), first.id());
        assert_eq!(observations[1].sample_flight().id(), second.id());
        assert!(observations.iter().all(Observation::is_awaiting_response));
    }
}
