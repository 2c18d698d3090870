//! Read-Through Cache
//!
//! `get_or_compute` serves a key from the store when present and otherwise
//! runs the query, stores its JSON with a TTL and returns it. Writers either
//! overwrite a key with the fresh value (`put`) or drop it (`invalidate`).
//!
//! List pages are keyed under a per-namespace generation number. A write bumps
//! the generation, so every cached page of that namespace stops being
//! addressable at once; the orphaned entries age out through their TTL.
//!
//! The cache never fails a request: store errors are logged and the call falls
//! through to the source of truth.

mod memory;
mod redis_store;
mod store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use memory::MemoryCacheStore;
pub use redis_store::RedisCacheStore;
pub use store::{CacheBackend, CacheStore, LocalCacheStore};

/// Default entry lifetime (30 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(1800);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Value plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    /// `true` when served from the cache
    pub cache: bool,
    pub data: T,
}

#[derive(Clone)]
pub struct ReadThroughCache<S = CacheBackend> {
    store: S,
    ttl: Duration,
}

impl ReadThroughCache<CacheBackend> {
    /// Process-local cache.
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(CacheBackend::Memory(MemoryCacheStore::new()), ttl)
    }

    pub async fn redis(redis_url: &str, ttl: Duration) -> Result<Self, CacheError> {
        let store = RedisCacheStore::connect(redis_url).await?;
        Ok(Self::new(CacheBackend::Redis(store), ttl))
    }
}

impl<S> ReadThroughCache<S>
where
    S: CacheStore + Sync,
{
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Configured default TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve `key` from the cache, or compute, store for `ttl` and return it.
    ///
    /// Errors from `compute` are returned as-is and nothing is stored.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(data) = self.lookup(key).await {
            tracing::debug!(key, "Cache hit");
            return Ok(Cached { cache: true, data });
        }

        let data = compute().await?;
        self.put(key, ttl, &data).await;
        Ok(Cached { cache: false, data })
    }

    /// Overwrite `key` with `value`.
    pub async fn put<T: Serialize>(&self, key: &str, ttl: Duration, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache value not serializable, skipping write");
                return;
            }
        };

        if let Err(e) = self.store.set_ex(key, raw, ttl).await {
            tracing::warn!(key, error = %e, "Cache write failed");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(key, error = %e, "Cache invalidation failed");
        }
    }

    /// Current generation of a list namespace (0 when never bumped).
    pub async fn generation(&self, namespace: &str) -> i64 {
        match self.store.get(&generation_key(namespace)).await {
            Ok(value) => value.and_then(|raw| raw.parse().ok()).unwrap_or(0),
            Err(e) => {
                tracing::warn!(namespace, error = %e, "Cache generation read failed");
                0
            }
        }
    }

    /// Retire every cached page of `namespace`.
    pub async fn bump_generation(&self, namespace: &str) {
        if let Err(e) = self.store.incr(&generation_key(namespace)).await {
            tracing::warn!(namespace, error = %e, "Cache generation bump failed");
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, using the store");
                None
            }
        }
    }
}

fn generation_key(namespace: &str) -> String {
    format!("{}:generation", namespace)
}
