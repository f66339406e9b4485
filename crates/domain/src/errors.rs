//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A sparse record was asked for a field it does not carry
    #[error("Property '{name}' is not valid or is not available for this record")]
    PropertyUnavailable { name: String },

    /// A value could not be interpreted
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl DomainError {
    /// Create a property unavailable error
    pub fn property_unavailable(name: impl Into<String>) -> Self {
        Self::PropertyUnavailable { name: name.into() }
    }
}
