//! SmartWeather error types

use thiserror::Error;

/// Errors that can occur while talking to a SmartWeather station
#[derive(Debug, Error)]
pub enum SmartWeatherError {
    /// The API key was rejected (HTTP 401/403)
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Transport failure or non-success HTTP status
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The response body is not usable at the top level
    #[error("Invalid result: {0}")]
    ResultError(String),

    /// A required key is missing or has the wrong type
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SmartWeatherError {
    /// Returns true if the same request may succeed on a later poll
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestError(_))
    }

    /// Returns true if polling should stop until the configuration changes
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidApiKey)
    }

    /// Shorthand for a missing required key
    pub(crate) fn missing(key: &str) -> Self {
        Self::MalformedResult(format!("missing required key '{key}'"))
    }
}
