//! Environment variable secret provider.
//!
//! A read-only [`SecretProvider`] for development and tests. It lets code
//! written against the provider contract run without a parameter store.
//! **Not for production**: environment variables are visible in process
//! listings and have no encryption or access control.
//!
//! # Key mapping
//!
//! A key path maps to one variable: the prefix (default `SSM_SECRET_`)
//! followed by the path without its leading `/`, with `/`, `-` and `.`
//! replaced by `_`, upper-cased.
//!
//! ```bash
//! export SSM_SECRET_TEST_DB_USER="dbUser"   # key: /test/db/user
//! ```
//!
//! Only scalars are returned; there is no nested reconstruction.

use async_trait::async_trait;
use std::env;
use tracing::debug;

use super::error::{Result, SecretsError};
use super::provider::{PutOptions, SecretProvider};
use super::types::Secret;

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "SSM_SECRET_";

const BACKEND: &str = "environment provider";

/// Read-only provider backed by environment variables.
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    prefix: String,
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom variable prefix instead of `SSM_SECRET_`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Name of the environment variable holding `key`.
    pub fn env_var_name(&self, key: &str) -> String {
        let path: String = key
            .trim_start_matches('/')
            .chars()
            .map(|c| match c {
                '/' | '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.prefix, path)
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn put_secret(&self, secret: Secret, _options: PutOptions) -> Result<Secret> {
        Err(SecretsError::read_only(BACKEND, "store", secret.key()))
    }

    async fn delete_secret(&self, secret: &Secret) -> Result<()> {
        Err(SecretsError::read_only(BACKEND, "delete", secret.key()))
    }

    async fn get_secret(&self, key: &str) -> Result<Secret> {
        let var = self.env_var_name(key);
        match env::var(&var) {
            Ok(value) => Ok(Secret::new(key, value)),
            Err(_) => {
                debug!(key = %key, env_var = %var, "Secret not found in environment");
                Err(SecretsError::not_found(key))
            }
        }
    }
}
