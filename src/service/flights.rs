//! Sample flight, token and response operations

use chrono::Utc;
use rand::Rng;
use serde_json::json;

use super::{ActionOutcome, Triangler};
use crate::experiment::{
    expiry_from, generate_token, ExperienceLevel, FlightToken, Observation, ResponseRecord,
    SampleFlight, SampleFlightRecord, SampleFlightToken,
};
use crate::significance::Choice;
use crate::table::Table;
use crate::{Error, Result};

/// Token draws before giving up on finding an unused code.
pub const MAX_TOKEN_ATTEMPTS: usize = 32;

impl Triangler {
    /// Serve a new sample flight and issue its token.
    ///
    /// `correct` names the odd sample; a random one is drawn from `rng` when
    /// absent. Token codes come from the same `rng`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown experiment (also when it is
    /// deleted concurrently) and `Error::TokenSpaceExhausted` if no unused
    /// code was drawn. The flight is not kept in either case.
    pub fn create_sample_flight<R: Rng + ?Sized>(
        &self,
        experiment_id: u64,
        correct: Option<Choice>,
        rng: &mut R,
    ) -> Result<Observation> {
        self.experiment(experiment_id)?;
        let correct = correct.unwrap_or_else(|| Choice::random(rng));
        let flight = self
            .store
            .sample_flights()
            .insert(SampleFlightRecord::new(experiment_id, correct))?;

        let token = match self.issue_token(flight.id(), rng) {
            Ok(token) => token,
            Err(err) => {
                self.store.delete_sample_flight(flight.id())?;
                return Err(err);
            }
        };

        // The experiment may have been deleted after the first check; its
        // cascade would then have missed this flight.
        if self.store.get_experiment(experiment_id)?.is_none() {
            self.store.delete_sample_flight(flight.id())?;
            tracing::error!(experiment_id, "experiment deleted while serving flight");
            return Err(Error::not_found("Experiment", experiment_id));
        }

        tracing::info!(
            id = flight.id(),
            experiment_id,
            token = token.token(),
            "created sample flight"
        );
        Ok(Observation::new(flight, Some(token), None))
    }

    fn issue_token<R: Rng + ?Sized>(&self, sample_flight_id: u64, rng: &mut R) -> Result<FlightToken> {
        let expiry_date = expiry_from(Utc::now(), self.config.token_expiry_days);
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let code = generate_token(rng, self.config.token_length);
            let candidate = SampleFlightToken::new(code, expiry_date, sample_flight_id);
            if let Some(token) = self.store.insert_token(candidate)? {
                return Ok(token);
            }
            tracing::debug!(attempt, sample_flight_id, "token collision");
        }
        tracing::error!(sample_flight_id, attempts = MAX_TOKEN_ATTEMPTS, "token space exhausted");
        Err(Error::TokenSpaceExhausted {
            attempts: MAX_TOKEN_ATTEMPTS,
        })
    }

    /// Get a sample flight.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no flight with that id.
    pub fn sample_flight(&self, id: u64) -> Result<SampleFlight> {
        self.store.sample_flights().get(id)?.ok_or_else(|| {
            tracing::error!(id, "sample flight not found");
            Error::not_found("SampleFlight", id)
        })
    }

    /// Get a sample flight joined with its token and response.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no flight with that id.
    pub fn observation(&self, sample_flight_id: u64) -> Result<Observation> {
        let flight = self.sample_flight(sample_flight_id)?;
        self.store.observation(flight)
    }

    /// Delete a sample flight with its token and response.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no flight with that id.
    pub fn delete_sample_flight(&self, id: u64) -> Result<ActionOutcome> {
        self.sample_flight(id)?;
        if !self.store.delete_sample_flight(id)? {
            return Err(Error::not_found("SampleFlight", id));
        }
        tracing::info!(id, "deleted sample flight");
        Ok(ActionOutcome::success("Sample flight found, proceeding to delete.")
            .with_details(json!({ "id": id })))
    }

    /// Resolve a token code to its flight.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidToken` if no token has that code.
    pub fn observation_for_token(&self, token: &str) -> Result<Observation> {
        let token = self.resolve_token(token)?;
        self.observation(token.sample_flight_id())
    }

    /// Push a token's expiry `token_expiry_days` past now.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidToken` if no token has that code.
    pub fn refresh_token(&self, token: &str) -> Result<FlightToken> {
        let id = self.resolve_token(token)?.id();
        let expiry_date = expiry_from(Utc::now(), self.config.token_expiry_days);
        let refreshed = self
            .store
            .tokens()
            .modify(id, |current| {
                *current = current.clone().refreshed(expiry_date);
                Ok(())
            })?
            .ok_or_else(|| Error::InvalidToken(token.to_string()))?;
        tracing::info!(token, expiry_date = %expiry_date, "refreshed token");
        Ok(refreshed)
    }

    /// Record a taster's answer for the flight behind `token`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidToken` for an unknown code,
    /// `Error::TokenExpired` once the token's expiry has passed,
    /// `Error::AlreadyExists` if the flight was already answered and
    /// `Error::NotFound` if the flight is deleted concurrently.
    pub fn submit_response(
        &self,
        token: &str,
        chosen: Choice,
        experience_level: ExperienceLevel,
    ) -> Result<Observation> {
        let issued = self.resolve_token(token)?;
        if issued.is_expired_at(Utc::now()) {
            tracing::warn!(token, expired_at = %issued.expiry_date(), "response with expired token");
            return Err(Error::TokenExpired {
                token: token.to_string(),
                expired_at: issued.expiry_date(),
            });
        }

        let flight = self.sample_flight(issued.sample_flight_id())?;
        let record = ResponseRecord::new(flight.experiment_id(), flight.id(), chosen, experience_level);
        let Some(response) = self.store.insert_response(record)? else {
            tracing::error!(sample_flight_id = flight.id(), "flight already answered");
            return Err(Error::already_exists(
                "Response",
                format!("sample flight {}", flight.id()),
            ));
        };

        // Same for a flight deleted while the response was being stored
        if self.store.sample_flights().get(flight.id())?.is_none() {
            self.store.delete_sample_flight(flight.id())?;
            tracing::error!(sample_flight_id = flight.id(), "flight deleted while recording response");
            return Err(Error::not_found("SampleFlight", flight.id()));
        }

        tracing::info!(
            id = response.id(),
            sample_flight_id = flight.id(),
            chosen = %chosen,
            "recorded response"
        );
        Ok(Observation::new(flight, Some(issued), Some(response)))
    }

    /// Every flight of an experiment, ordered by flight id.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn observations(&self, experiment_id: u64) -> Result<Vec<Observation>> {
        self.experiment(experiment_id)?;
        self.store.observations_for_experiment(experiment_id)
    }

    /// Flights of an experiment still awaiting a response.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn pending_observations(&self, experiment_id: u64) -> Result<Vec<Observation>> {
        Ok(self
            .observations(experiment_id)?
            .into_iter()
            .filter(Observation::is_awaiting_response)
            .collect())
    }

    fn resolve_token(&self, token: &str) -> Result<FlightToken> {
        self.store.find_token(token)?.ok_or_else(|| {
            tracing::error!(token, "unknown token");
            Error::InvalidToken(token.to_string())
        })
    }
}
