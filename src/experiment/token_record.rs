//! Sample Flight Token - short code a taster uses to answer a flight

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Token handed to the taster (printed on the flight card) to submit a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleFlightToken {
    token: String,
    expiry_date: DateTime<Utc>,
    sample_flight_id: u64,
}

impl SampleFlightToken {
    /// Create a token for a flight.
    ///
    /// # Arguments
    ///
    /// * `token` - The code itself
    /// * `expiry_date` - Instant after which responses are refused
    /// * `sample_flight_id` - ID of the flight this token answers
    #[must_use]
    pub fn new(token: impl Into<String>, expiry_date: DateTime<Utc>, sample_flight_id: u64) -> Self {
        Self {
            token: token.into(),
            expiry_date,
            sample_flight_id,
        }
    }

    /// Get the code.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the expiry instant.
    #[must_use]
    pub const fn expiry_date(&self) -> DateTime<Utc> {
        self.expiry_date
    }

    /// Get the flight ID.
    #[must_use]
    pub const fn sample_flight_id(&self) -> u64 {
        self.sample_flight_id
    }

    /// Has the token expired at `now`?
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry_date
    }

    /// Same token with a new expiry.
    #[must_use]
    pub fn refreshed(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = expiry_date;
        self
    }
}

/// Draw a random token: `length` uppercase letters and digits.
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect()
}

/// Expiry instant `days` from `now`.
#[must_use]
pub fn expiry_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}
