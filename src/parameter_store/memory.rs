//! In-memory parameter store.
//!
//! Mirrors the path semantics of a hierarchical parameter store without any
//! network access. Useful for tests (it records every call it receives) and
//! for running an application locally without cloud credentials.
//!
//! # Example
//!
//! ```rust
//! use ssm_secrets::parameter_store::{InMemoryParameterStore, ParameterStoreClient};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryParameterStore::with_parameters([
//!     ("/app/db/user", "admin"),
//!     ("/app/db/password", "hunter2"),
//! ]);
//!
//! let parameters = store.fetch_by_prefix("/app/db").await.unwrap();
//! assert_eq!(parameters.len(), 2);
//! assert_eq!(store.fetch_calls(), 1);
//! # });
//! ```

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::ParameterStoreError;
use super::{
    Parameter, ParameterStoreClient, ParameterType, PutParameterRequest, Result, PATH_SEPARATOR,
};
use crate::secrets::SecretString;

#[derive(Debug, Clone)]
struct StoredParameter {
    value: SecretString,
    parameter_type: ParameterType,
    version: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    parameters: IndexMap<String, StoredParameter>,
    put_requests: Vec<PutParameterRequest>,
    next_failure: Option<ParameterStoreError>,
}

/// Process-local [`ParameterStoreClient`].
///
/// Parameters are kept in insertion order, which is also the order
/// [`fetch_by_prefix`](ParameterStoreClient::fetch_by_prefix) returns them in.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    state: RwLock<StoreState>,
    fetch_calls: AtomicUsize,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `SecureString` parameters.
    pub fn with_parameters<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SecretString>,
    {
        let parameters = parameters
            .into_iter()
            .map(|(name, value)| {
                let stored = StoredParameter {
                    value: value.into(),
                    parameter_type: ParameterType::SecureString,
                    version: 1,
                };
                (name.into(), stored)
            })
            .collect();

        Self {
            state: RwLock::new(StoreState { parameters, ..Default::default() }),
            ..Default::default()
        }
    }

    /// Makes the next call (of any kind) fail with `error`.
    pub async fn fail_next(&self, error: ParameterStoreError) {
        self.state.write().await.next_failure = Some(error);
    }

    /// Current value of a parameter, if present.
    pub async fn value(&self, name: &str) -> Option<SecretString> {
        self.state.read().await.parameters.get(name).map(|p| p.value.clone())
    }

    /// Current type and version of a parameter, if present.
    pub async fn describe(&self, name: &str) -> Option<(ParameterType, u64)> {
        self.state.read().await.parameters.get(name).map(|p| (p.parameter_type, p.version))
    }

    /// Number of stored parameters.
    pub async fn len(&self) -> usize {
        self.state.read().await.parameters.len()
    }

    /// Returns true if the store holds no parameters.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.parameters.is_empty()
    }

    /// Every put request received, oldest first.
    pub async fn put_requests(&self) -> Vec<PutParameterRequest> {
        self.state.read().await.put_requests.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn matches_prefix(name: &str, prefix: &str) -> bool {
        if prefix.ends_with(PATH_SEPARATOR) {
            return name.starts_with(prefix);
        }
        match name.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(PATH_SEPARATOR),
            None => false,
        }
    }
}

#[async_trait]
impl ParameterStoreClient for InMemoryParameterStore {
    async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<Parameter>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }

        if !prefix.starts_with(PATH_SEPARATOR) {
            return Err(ParameterStoreError::invalid_identifier(
                prefix,
                "parameter path must begin with '/'",
            ));
        }

        let parameters: Vec<Parameter> = state
            .parameters
            .iter()
            .filter(|(name, _)| Self::matches_prefix(name, prefix))
            .map(|(name, stored)| Parameter::new(name.clone(), stored.value.clone()))
            .collect();

        debug!(prefix = %prefix, count = parameters.len(), "Fetched parameters by prefix");
        Ok(parameters)
    }

    async fn put_one(&self, request: PutParameterRequest) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }

        let version = match state.parameters.get(&request.name) {
            Some(_) if !request.overwrite => {
                return Err(ParameterStoreError::already_exists(&request.name));
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };

        let stored = StoredParameter {
            value: request.value.clone(),
            parameter_type: request.parameter_type,
            version,
        };
        state.parameters.insert(request.name.clone(), stored);
        debug!(name = %request.name, version = version, "Stored parameter");
        state.put_requests.push(request);
        Ok(())
    }

    async fn delete_one(&self, name: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }

        match state.parameters.shift_remove(name) {
            Some(_) => Ok(()),
            None => Err(ParameterStoreError::not_found(name)),
        }
    }
}
