//! Secret providers.
//!
//! Every backend implements the [`SecretProvider`] trait, so application
//! code can swap one for another without changing call sites:
//!
//! - **put_secret**: store a scalar secret
//! - **delete_secret**: delete a secret by key
//! - **get_secret**: read a secret, possibly rebuilt from many parameters
//!
//! # Backends
//!
//! - [`SsmSecretProvider`]: hierarchical parameter store (AWS Systems Manager
//!   Parameter Store with the `aws` feature, or any [`ParameterStoreClient`])
//! - [`EnvSecretProvider`]: read-only, environment variables, development only
//!
//! # Example
//!
//! ```rust,ignore
//! use ssm_secrets::config::SsmConfig;
//! use ssm_secrets::secrets::{PutOptions, Secret, SecretProvider, SsmSecretProvider};
//!
//! let provider = SsmSecretProvider::from_config(&SsmConfig::from_env()?).await?;
//!
//! provider.put_secret(Secret::new("/app/db/password", "hunter2"), PutOptions::default()).await?;
//!
//! // Reads every parameter under /app/db into one nested value
//! let db = provider.get_secret("/app/db").await?;
//! let password = db.value().pointer("password");
//! ```
//!
//! [`ParameterStoreClient`]: crate::parameter_store::ParameterStoreClient

pub mod cache;
pub mod env;
pub mod error;
pub mod provider;
pub mod ssm;
pub mod tree;
pub mod types;

pub use cache::SecretCache;
pub use env::EnvSecretProvider;
pub use error::{Result, SecretsError};
pub use provider::{PutOptions, SecretProvider};
pub use ssm::SsmSecretProvider;
pub use tree::TreeBuilder;
pub use types::{Secret, SecretString, SecretValue};
