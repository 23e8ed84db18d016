//! Action Outcome - acknowledgement returned by destructive operations

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Acknowledgement of an action such as a delete.
///
/// An unsuccessful outcome always carries a message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionOutcome {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ActionOutcome {
    /// Create an outcome.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `success` is false and `message` is blank.
    pub fn new(success: bool, message: impl Into<String>, details: Option<Value>) -> Result<Self> {
        let message = message.into();
        if !success && message.trim().is_empty() {
            return Err(Error::Validation(
                "A message is required when success is false".to_string(),
            ));
        }
        Ok(Self {
            success,
            message,
            details,
        })
    }

    /// Successful outcome without details.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Did the action succeed?
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}
