//! Provider-owned secret cache.
//!
//! Maps an exact lookup key (a requested key, or the full name of a parameter
//! seen during a prefix scan) to the secret it resolved to. Entries live
//! until they are invalidated or the cache is cleared; there is no TTL and no
//! size bound.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::Secret;

/// In-memory secret cache, cheap to clone and safe to share across tasks.
///
/// Clones share the same underlying map, so a handle obtained from a
/// provider can be used to inspect or reset that provider's cache.
#[derive(Debug, Clone, Default)]
pub struct SecretCache {
    inner: Arc<RwLock<HashMap<String, Secret>>>,
}

impl SecretCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached secret if present
    pub async fn get(&self, key: &str) -> Option<Secret> {
        let cache = self.inner.read().await;
        cache.get(key).cloned()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.contains_key(key)
    }

    /// Insert a secret into the cache
    pub async fn insert(&self, key: impl Into<String>, secret: Secret) {
        let key = key.into();
        debug!(key = %key, "Caching secret");
        self.inner.write().await.insert(key, secret);
    }

    /// Insert several entries under one write lock.
    ///
    /// Readers observe either none or all of the entries.
    pub async fn insert_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Secret)>,
    {
        let mut cache = self.inner.write().await;
        let before = cache.len();
        cache.extend(entries);
        debug!(cached = cache.len(), added = cache.len().saturating_sub(before), "Cached secrets");
    }

    /// Remove a single entry. Returns whether it was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.write().await.remove(key).is_some();
        debug!(key = %key, removed = removed, "Invalidated cached secret");
        removed
    }

    /// Clear all cache entries
    pub async fn clear(&self) {
        let mut cache = self.inner.write().await;
        debug!(count = cache.len(), "Clearing secret cache");
        cache.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Keys currently cached, in no particular order.
    pub async fn keys(&self) -> Vec<String> {
        self.inner.read().await.keys().cloned().collect()
    }
}
