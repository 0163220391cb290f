//! Error types for secret provider operations.

use thiserror::Error;

use crate::parameter_store::ParameterStoreError;

/// Result type for secret provider operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while reading or writing secrets through a provider.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The requested key does not resolve to any secret.
    #[error("Secret not found: {key}")]
    NotFound { key: String },

    /// The secret value cannot be stored by this backend (e.g. a nested tree
    /// handed to a store that only accepts scalars).
    #[error("Unsupported secret value for '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },

    /// The backend does not support write operations.
    #[error("Cannot {operation} secret '{key}': {backend} is read-only")]
    ReadOnly { backend: &'static str, operation: &'static str, key: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failure reported by the remote parameter store, passed through as-is.
    #[error(transparent)]
    Remote(#[from] ParameterStoreError),
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an unsupported value error.
    pub fn unsupported_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedValue { key: key.into(), reason: reason.into() }
    }

    /// Create a read-only backend error.
    pub fn read_only(
        backend: &'static str,
        operation: &'static str,
        key: impl Into<String>,
    ) -> Self {
        Self::ReadOnly { backend, operation, key: key.into() }
    }

    /// Create a config error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Returns true when the error means the secret does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<validator::ValidationErrors> for SecretsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::config_error(errors.to_string())
    }
}
