//! Remote parameter store collaborator.
//!
//! The secret provider never talks to a parameter store directly. It goes
//! through [`ParameterStoreClient`], which exposes the three operations the
//! provider needs:
//!
//! - **fetch_by_prefix**: every parameter at or below a path, decrypted
//! - **put_one**: write a single parameter
//! - **delete_one**: delete a single parameter by name
//!
//! # Implementations
//!
//! - [`AwsSsmParameterStore`]: AWS Systems Manager Parameter Store (feature `aws`)
//! - [`InMemoryParameterStore`]: process-local store for tests and local development

#[cfg(feature = "aws")]
pub mod aws;
pub mod error;
pub mod memory;

#[cfg(feature = "aws")]
pub use aws::AwsSsmParameterStore;
pub use error::ParameterStoreError;
pub use memory::InMemoryParameterStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::secrets::SecretString;

/// Separator between path segments in parameter names.
pub const PATH_SEPARATOR: char = '/';

/// Result type for parameter store operations.
pub type Result<T> = std::result::Result<T, ParameterStoreError>;

/// A parameter as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Full path of the parameter, e.g. `/app/db/user`
    pub name: String,

    /// Decrypted value
    pub value: SecretString,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<SecretString>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Storage type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    StringList,
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::StringList => "StringList",
            Self::SecureString => "SecureString",
        }
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "StringList" => Ok(Self::StringList),
            "SecureString" => Ok(Self::SecureString),
            _ => Err(format!("Unknown parameter type: {}", s)),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage tier of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterTier {
    Standard,
    Advanced,
    IntelligentTiering,
}

impl ParameterTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Advanced => "Advanced",
            Self::IntelligentTiering => "Intelligent-Tiering",
        }
    }
}

/// Key/value tag attached to a parameter on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterTag {
    pub key: String,
    pub value: String,
}

impl ParameterTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// A single parameter write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutParameterRequest {
    pub name: String,
    pub value: SecretString,
    pub overwrite: bool,
    pub parameter_type: ParameterType,
    pub description: Option<String>,
    /// KMS key used to encrypt a `SecureString`
    pub key_id: Option<String>,
    pub tier: Option<ParameterTier>,
    pub allowed_pattern: Option<String>,
    pub data_type: Option<String>,
    pub tags: Vec<ParameterTag>,
}

/// Client for a remote, path-based parameter store.
///
/// Implementations own transport, authentication and retries. Errors are
/// reported as [`ParameterStoreError`]; a missing path or parameter must be
/// reported as [`ParameterStoreError::NotFound`] or
/// [`ParameterStoreError::InvalidIdentifier`] so callers can tell absence
/// apart from other failures.
#[async_trait]
pub trait ParameterStoreClient: Send + Sync {
    /// Fetch every parameter whose name equals `prefix` or lives below it,
    /// recursively, with values decrypted. Order is the order the store
    /// returns them in.
    async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<Parameter>>;

    /// Write a single parameter.
    async fn put_one(&self, request: PutParameterRequest) -> Result<()>;

    /// Delete a single parameter by its full name.
    async fn delete_one(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl<T: ParameterStoreClient + ?Sized> ParameterStoreClient for std::sync::Arc<T> {
    async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<Parameter>> {
        (**self).fetch_by_prefix(prefix).await
    }

    async fn put_one(&self, request: PutParameterRequest) -> Result<()> {
        (**self).put_one(request).await
    }

    async fn delete_one(&self, name: &str) -> Result<()> {
        (**self).delete_one(name).await
    }
}
