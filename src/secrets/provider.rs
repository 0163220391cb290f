//! The secret provider contract shared by every backend.

use async_trait::async_trait;

use super::error::Result;
use super::types::Secret;
use crate::parameter_store::{ParameterTag, ParameterTier};

/// Caller-supplied options for [`SecretProvider::put_secret`].
///
/// Backends apply the options they understand and ignore the rest. The
/// secret's key and value always come from the [`Secret`] itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Replace an existing value. Backends default to `true` when unset.
    pub overwrite: Option<bool>,
    pub description: Option<String>,
    /// Encryption key identifier (e.g. a KMS key id or alias)
    pub key_id: Option<String>,
    pub tier: Option<ParameterTier>,
    /// Regular expression the value must match
    pub allowed_pattern: Option<String>,
    pub data_type: Option<String>,
    pub tags: Vec<ParameterTag>,
}

impl PutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub fn with_tier(mut self, tier: ParameterTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(ParameterTag::new(key, value));
        self
    }
}

/// Backend-agnostic access to secrets.
///
/// Call sites depend on this trait only, so one backend can be swapped for
/// another without touching them.
///
/// # Errors
///
/// - [`SecretsError::NotFound`](super::SecretsError::NotFound) if a key does not resolve
/// - [`SecretsError::UnsupportedValue`](super::SecretsError::UnsupportedValue) if the backend cannot store the value
/// - [`SecretsError::ReadOnly`](super::SecretsError::ReadOnly) if the backend cannot be written
/// - backend failures, passed through unchanged
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Store a secret and return it unchanged.
    ///
    /// Implementations MUST NOT log the secret value.
    async fn put_secret(&self, secret: Secret, options: PutOptions) -> Result<Secret>;

    /// Delete a secret by its key.
    async fn delete_secret(&self, secret: &Secret) -> Result<()>;

    /// Retrieve a secret by key.
    async fn get_secret(&self, key: &str) -> Result<Secret>;

    /// Check if a secret exists.
    async fn secret_exists(&self, key: &str) -> Result<bool> {
        match self.get_secret(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
