//! Parameter store secret provider.
//!
//! Exposes a hierarchical parameter store (AWS Systems Manager Parameter
//! Store or anything else behind [`ParameterStoreClient`]) as a
//! [`SecretProvider`].
//!
//! # Reads
//!
//! A key is treated as a path prefix. Every parameter at or below it is
//! fetched in one call and rebuilt into a single value:
//!
//! - one parameter named exactly like the key reads back as a scalar
//! - several parameters read back as a tree keyed by their path below the key
//!
//! Results are cached for the lifetime of the provider, both under the
//! requested key and under each parameter's own name, so reading a sub-key
//! after its parent costs no extra round trip.
//!
//! # Caveat: single nested parameter
//!
//! Whenever a lookup returns exactly one parameter, the result is the one
//! value it contains. For a parameter that sits below the key (a true
//! one-child hierarchy) that drops its first path segment: reading `/app`
//! when only `/app/db/user` exists yields `{user: ...}`, not
//! `{db: {user: ...}}`. Existing consumers rely on this; do not depend on it
//! for new code.
//!
//! # Writes
//!
//! Only scalar values can be written. Every write is a `SecureString` and
//! overwrites by default. Writes do not touch the cache.
//!
//! # Example
//!
//! ```rust
//! use ssm_secrets::parameter_store::InMemoryParameterStore;
//! use ssm_secrets::secrets::{SecretProvider, SsmSecretProvider};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryParameterStore::with_parameters([
//!     ("/app/db/user", "admin"),
//!     ("/app/db/password", "hunter2"),
//! ]);
//! let provider = SsmSecretProvider::new(store);
//!
//! let db = provider.get_secret("/app/db").await.unwrap();
//! assert_eq!(db.value().pointer("user").and_then(|v| v.as_str()), Some("admin"));
//!
//! // Served from the cache populated by the lookup above
//! let user = provider.get_secret("/app/db/user").await.unwrap();
//! assert_eq!(user.value().as_str(), Some("admin"));
//! assert_eq!(provider.client().fetch_calls(), 1);
//! # });
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::cache::SecretCache;
use super::error::{Result, SecretsError};
use super::provider::{PutOptions, SecretProvider};
use super::tree::TreeBuilder;
use super::types::{Secret, SecretValue};
use crate::observability::metrics;
use crate::parameter_store::{ParameterStoreClient, ParameterType, PutParameterRequest};

#[cfg(feature = "aws")]
use crate::config::SsmConfig;
#[cfg(feature = "aws")]
use crate::parameter_store::AwsSsmParameterStore;

/// [`SecretProvider`] backed by a path-based parameter store.
pub struct SsmSecretProvider<C: ParameterStoreClient> {
    client: C,
    cache: SecretCache,
}

impl<C: ParameterStoreClient> SsmSecretProvider<C> {
    /// Creates a provider with an empty cache.
    pub fn new(client: C) -> Self {
        Self::with_cache(client, SecretCache::new())
    }

    /// Creates a provider around an existing cache handle.
    pub fn with_cache(client: C, cache: SecretCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handle to this provider's cache.
    pub fn cache(&self) -> &SecretCache {
        &self.cache
    }

    fn build_put_request(secret: &Secret, options: PutOptions) -> Result<PutParameterRequest> {
        let value = secret.value().to_scalar_string().ok_or_else(|| {
            SecretsError::unsupported_value(
                secret.key(),
                "parameter store does not support nested values",
            )
        })?;

        Ok(PutParameterRequest {
            name: secret.key().to_string(),
            value: value.into(),
            overwrite: options.overwrite.unwrap_or(true),
            parameter_type: ParameterType::SecureString,
            description: options.description,
            key_id: options.key_id,
            tier: options.tier,
            allowed_pattern: options.allowed_pattern,
            data_type: options.data_type,
            tags: options.tags,
        })
    }
}

#[cfg(feature = "aws")]
impl SsmSecretProvider<AwsSsmParameterStore> {
    /// Creates a provider talking to AWS Systems Manager.
    pub async fn from_config(config: &SsmConfig) -> Result<Self> {
        Ok(Self::new(AwsSsmParameterStore::from_config(config).await?))
    }
}

impl<C: ParameterStoreClient> std::fmt::Debug for SsmSecretProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmSecretProvider").field("cache", &"[SecretCache]").finish()
    }
}

#[async_trait]
impl<C: ParameterStoreClient> SecretProvider for SsmSecretProvider<C> {
    async fn put_secret(&self, secret: Secret, options: PutOptions) -> Result<Secret> {
        let request = Self::build_put_request(&secret, options)?;
        let overwrite = request.overwrite;

        if let Err(e) = self.client.put_one(request).await {
            metrics::record_remote_call("put", "error");
            warn!(key = %secret.key(), error = %e, "Failed to store secret");
            return Err(e.into());
        }

        metrics::record_remote_call("put", "ok");
        info!(key = %secret.key(), overwrite = overwrite, "Stored secret");
        Ok(secret)
    }

    async fn delete_secret(&self, secret: &Secret) -> Result<()> {
        if let Err(e) = self.client.delete_one(secret.key()).await {
            metrics::record_remote_call("delete", "error");
            warn!(key = %secret.key(), error = %e, "Failed to delete secret");
            return Err(e.into());
        }

        metrics::record_remote_call("delete", "ok");
        self.cache.invalidate(secret.key()).await;
        info!(key = %secret.key(), "Deleted secret");
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Secret> {
        if let Some(secret) = self.cache.get(key).await {
            metrics::record_cache_lookup(true);
            debug!(key = %key, "Cache hit for secret");
            return Ok(secret);
        }
        metrics::record_cache_lookup(false);

        let parameters = match self.client.fetch_by_prefix(key).await {
            Ok(parameters) => parameters,
            Err(e) if e.is_not_found() => {
                metrics::record_remote_call("fetch", "not_found");
                debug!(key = %key, error = %e, "Parameter store has no such path");
                return Err(SecretsError::not_found(key));
            }
            Err(e) => {
                metrics::record_remote_call("fetch", "error");
                warn!(key = %key, error = %e, "Failed to fetch secret");
                return Err(e.into());
            }
        };
        metrics::record_remote_call("fetch", "ok");

        let mut builder = TreeBuilder::new(key);
        let mut entries = Vec::with_capacity(parameters.len() + 1);
        for parameter in parameters {
            let value = SecretValue::String(parameter.value);
            builder.insert(&parameter.name, value.clone());
            entries.push((parameter.name.clone(), Secret::new(parameter.name, value)));
        }

        let parameter_count = builder.count();
        let Some(value) = builder.finish() else {
            debug!(key = %key, "No parameters under path");
            return Err(SecretsError::not_found(key));
        };

        let secret = Secret::new(key, value);
        entries.push((key.to_string(), secret.clone()));
        self.cache.insert_all(entries).await;

        debug!(
            key = %key,
            parameter_count = parameter_count,
            "Fetched secret from parameter store"
        );
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_store::{InMemoryParameterStore, ParameterStoreError, ParameterTier};
    use std::sync::Arc;

    fn nested_store() -> InMemoryParameterStore {
        InMemoryParameterStore::with_parameters([
            ("/test/db/name", "dbName"),
            ("/test/db/extra/test1", "test1"),
            ("/test/db/extra/test2", "test2"),
            ("/test/db/user", "dbUser"),
        ])
    }

    #[tokio::test]
    async fn test_get_single_flat_parameter() {
        let key = "/test/MyTestDatabaseSecret";
        let provider =
            SsmSecretProvider::new(InMemoryParameterStore::with_parameters([(key, "secret")]));

        let secret = provider.get_secret(key).await.unwrap();
        assert_eq!(secret.key(), key);
        assert_eq!(secret.value(), &SecretValue::from("secret"));
        assert_eq!(provider.client().fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_nested_values() {
        let provider = SsmSecretProvider::new(nested_store());

        let secret = provider.get_secret("/test/db").await.unwrap();
        let expected = SecretValue::tree([
            ("name", SecretValue::from("dbName")),
            ("extra", SecretValue::tree([("test1", "test1"), ("test2", "test2")])),
            ("user", SecretValue::from("dbUser")),
        ]);
        assert_eq!(secret.value(), &expected);

        let user = provider.get_secret("/test/db/user").await.unwrap();
        assert_eq!(user.key(), "/test/db/user");
        assert_eq!(user.value().as_str(), Some("dbUser"));
        assert_eq!(provider.client().fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_caches_every_parameter() {
        let provider = SsmSecretProvider::new(nested_store());
        provider.get_secret("/test/db").await.unwrap();

        let mut keys = provider.cache().keys().await;
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "/test/db",
                "/test/db/extra/test1",
                "/test/db/extra/test2",
                "/test/db/name",
                "/test/db/user",
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_gets_hit_cache() {
        let provider = SsmSecretProvider::new(nested_store());

        let first = provider.get_secret("/test/db").await.unwrap();
        let second = provider.get_secret("/test/db").await.unwrap();
        let third = provider.get_secret("/test/db").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(provider.client().fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_not_found_is_translated() {
        let store = InMemoryParameterStore::new();
        store.fail_next(ParameterStoreError::not_found("opaque-remote-id")).await;
        let provider = SsmSecretProvider::new(store);

        let err = provider.get_secret("/test/missing").await.unwrap_err();
        match err {
            SecretsError::NotFound { key } => assert_eq!(key, "/test/missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_not_found() {
        let provider = SsmSecretProvider::new(InMemoryParameterStore::new());

        let err = provider.get_secret("not-a-path").await.unwrap_err();
        assert!(matches!(err, SecretsError::NotFound { ref key } if key == "not-a-path"));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let provider = SsmSecretProvider::new(nested_store());

        let err = provider.get_secret("/test/nothing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(provider.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_other_remote_errors_propagate() {
        let store = nested_store();
        store.fail_next(ParameterStoreError::service("ThrottlingException", "Rate exceeded")).await;
        let provider = SsmSecretProvider::new(store);

        let err = provider.get_secret("/test/db").await.unwrap_err();
        assert!(matches!(
            err,
            SecretsError::Remote(ParameterStoreError::Service { ref code, .. })
                if code == "ThrottlingException"
        ));
        assert!(provider.cache().is_empty().await);

        // Nothing was cached, so the next read goes back to the store
        assert!(provider.get_secret("/test/db").await.is_ok());
        assert_eq!(provider.client().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_put_secret_request_shape() {
        let provider = SsmSecretProvider::new(InMemoryParameterStore::new());

        let secret = Secret::new("test-key", "value");
        let returned = provider.put_secret(secret.clone(), PutOptions::default()).await.unwrap();
        assert_eq!(returned, secret);

        let requests = provider.client().put_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "test-key");
        assert_eq!(requests[0].value.expose_secret(), "value");
        assert_eq!(requests[0].parameter_type, ParameterType::SecureString);
        assert!(requests[0].overwrite);
    }

    #[tokio::test]
    async fn test_put_secret_carries_options() {
        let provider = SsmSecretProvider::new(InMemoryParameterStore::new());
        let options = PutOptions::new()
            .with_overwrite(false)
            .with_description("API token")
            .with_key_id("alias/payments")
            .with_tier(ParameterTier::Advanced)
            .with_allowed_pattern("^[0-9]+$")
            .with_data_type("text")
            .with_tag("team", "payments");

        provider.put_secret(Secret::new("/app/token", 1234i64), options).await.unwrap();

        let request = &provider.client().put_requests().await[0];
        assert_eq!(request.name, "/app/token");
        assert_eq!(request.value.expose_secret(), "1234");
        assert!(!request.overwrite);
        assert_eq!(request.description.as_deref(), Some("API token"));
        assert_eq!(request.key_id.as_deref(), Some("alias/payments"));
        assert_eq!(request.tier, Some(ParameterTier::Advanced));
        assert_eq!(request.allowed_pattern.as_deref(), Some("^[0-9]+$"));
        assert_eq!(request.data_type.as_deref(), Some("text"));
        assert_eq!(request.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_put_rejects_tree_without_remote_call() {
        let provider = SsmSecretProvider::new(InMemoryParameterStore::new());
        let secret = Secret::new("/app/db", SecretValue::tree([("user", "admin")]));

        let err = provider.put_secret(secret, PutOptions::default()).await.unwrap_err();
        assert!(matches!(err, SecretsError::UnsupportedValue { .. }));
        assert_eq!(provider.client().put_calls(), 0);
    }

    #[tokio::test]
    async fn test_put_does_not_populate_cache() {
        let provider = SsmSecretProvider::new(InMemoryParameterStore::new());
        provider.put_secret(Secret::new("/app/key", "v"), PutOptions::default()).await.unwrap();
        assert!(provider.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_put_remote_failure_propagates() {
        let store = InMemoryParameterStore::with_parameters([("/app/key", "old")]);
        let provider = SsmSecretProvider::new(store);

        let err = provider
            .put_secret(Secret::new("/app/key", "new"), PutOptions::new().with_overwrite(false))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretsError::Remote(ParameterStoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_delete_evicts_cache() {
        let provider = SsmSecretProvider::new(Arc::new(InMemoryParameterStore::with_parameters([
            ("/app/key", "v1"),
        ])));

        let secret = provider.get_secret("/app/key").await.unwrap();
        assert!(provider.cache().contains("/app/key").await);

        provider.delete_secret(&secret).await.unwrap();
        assert!(!provider.cache().contains("/app/key").await);
        assert_eq!(provider.client().delete_calls(), 1);

        // The next read goes back to the store, which no longer has it
        assert!(provider.get_secret("/app/key").await.unwrap_err().is_not_found());
        assert_eq!(provider.client().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_uncached_key_is_fine() {
        let provider =
            SsmSecretProvider::new(InMemoryParameterStore::with_parameters([("/app/key", "v")]));

        provider.delete_secret(&Secret::new("/app/key", "")).await.unwrap();
        assert!(provider.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_does_not_evict_children() {
        let provider = SsmSecretProvider::new(nested_store());
        let db = provider.get_secret("/test/db").await.unwrap();

        provider.delete_secret(&db).await.unwrap_err();
        assert!(provider.cache().contains("/test/db").await);

        provider.delete_secret(&Secret::new("/test/db/user", "")).await.unwrap();
        assert!(!provider.cache().contains("/test/db/user").await);
        assert!(provider.cache().contains("/test/db").await);
        assert!(provider.cache().contains("/test/db/name").await);
    }

    #[tokio::test]
    async fn test_shared_cache_handle() {
        let cache = SecretCache::new();
        let provider = SsmSecretProvider::with_cache(nested_store(), cache.clone());

        provider.get_secret("/test/db").await.unwrap();
        assert_eq!(cache.len().await, 5);

        cache.clear().await;
        provider.get_secret("/test/db").await.unwrap();
        assert_eq!(provider.client().fetch_calls(), 2);
    }
}
