//! # ssm-secrets
//!
//! Read and write application secrets kept in a hierarchical parameter store
//! (AWS Systems Manager Parameter Store) through a backend-agnostic
//! [`SecretProvider`](secrets::SecretProvider) trait.
//!
//! ## Architecture
//!
//! ```text
//! application → SecretProvider → SsmSecretProvider → ParameterStoreClient → SSM
//!                     ↑                 ↓
//!             EnvSecretProvider    SecretCache
//! ```
//!
//! ## Core Components
//!
//! - **Secret providers** ([`secrets`]): the provider contract, the parameter
//!   store provider with its cache and nested-value reconstruction, and a
//!   read-only environment provider
//! - **Parameter store clients** ([`parameter_store`]): the AWS SDK client
//!   (feature `aws`) and an in-memory store
//! - **Configuration** ([`config`]) and **observability** ([`observability`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ssm_secrets::config::{ObservabilityConfig, SsmConfig};
//! use ssm_secrets::observability::init_logging;
//! use ssm_secrets::secrets::{SecretProvider, SsmSecretProvider};
//!
//! # #[cfg(feature = "aws")]
//! #[tokio::main]
//! async fn main() -> ssm_secrets::secrets::Result<()> {
//!     init_logging(&ObservabilityConfig::from_env()?)?;
//!
//!     let provider = SsmSecretProvider::from_config(&SsmConfig::from_env()?).await?;
//!     let db = provider.get_secret("/app/db").await?;
//!     println!("database settings: {:?}", db);
//!     Ok(())
//! }
//! # #[cfg(not(feature = "aws"))]
//! # fn main() {}
//! ```

pub mod config;
pub mod observability;
pub mod parameter_store;
pub mod secrets;

pub use parameter_store::{ParameterStoreClient, ParameterStoreError};
pub use secrets::{PutOptions, Secret, SecretProvider, SecretValue, SecretsError, SsmSecretProvider};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
