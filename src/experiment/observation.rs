//! Observation - read-side view joining a flight, its token and its response

use serde::Serialize;

use super::{FlightToken, Response, SampleFlight};
use crate::significance::Outcome;

/// A sample flight together with the token that answers it and the response,
/// if one has been submitted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Observation {
    experiment_id: u64,
    sample_flight: SampleFlight,
    token: Option<FlightToken>,
    response: Option<Response>,
    is_correct: bool,
}

impl Observation {
    /// Join a flight with its token and response.
    #[must_use]
    pub fn new(
        sample_flight: SampleFlight,
        token: Option<FlightToken>,
        response: Option<Response>,
    ) -> Self {
        let is_correct = sample_flight
            .outcome(response.as_ref().map(|r| r.chosen()))
            .is_correct();
        Self {
            experiment_id: sample_flight.experiment_id(),
            sample_flight,
            token,
            response,
            is_correct,
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub const fn experiment_id(&self) -> u64 {
        self.experiment_id
    }

    /// Get the flight.
    #[must_use]
    pub const fn sample_flight(&self) -> &SampleFlight {
        &self.sample_flight
    }

    /// Get the flight's token, if one was issued.
    #[must_use]
    pub const fn token(&self) -> Option<&FlightToken> {
        self.token.as_ref()
    }

    /// Get the response, if submitted.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Was the odd sample identified? `false` while awaiting a response.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Still waiting for the taster?
    #[must_use]
    pub const fn is_awaiting_response(&self) -> bool {
        self.response.is_none()
    }

    /// The outcome this observation contributes to its experiment's sample set.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        Outcome::new(self.is_correct)
    }
}
