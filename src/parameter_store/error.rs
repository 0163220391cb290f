//! Errors reported by parameter store clients.

use thiserror::Error;

/// Errors raised by a [`ParameterStoreClient`](super::ParameterStoreClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterStoreError {
    /// The named parameter or path does not exist.
    #[error("Parameter not found: {name}")]
    NotFound { name: String },

    /// The store rejected the name or path as malformed.
    #[error("Invalid parameter identifier '{name}': {message}")]
    InvalidIdentifier { name: String, message: String },

    /// A put without overwrite hit an existing parameter.
    #[error("Parameter already exists: {name}")]
    AlreadyExists { name: String },

    /// Any other error returned by the service.
    #[error("Parameter store service error ({code}): {message}")]
    Service { code: String, message: String },

    /// The request never produced a service response.
    #[error("Parameter store transport error: {message}")]
    Transport { message: String },
}

impl ParameterStoreError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into(), message: message.into() }
    }

    /// Create an already exists error.
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Create a service error.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service { code: code.into(), message: message.into() }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Returns true for the conditions a provider reports as "secret not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidIdentifier { .. })
    }
}
