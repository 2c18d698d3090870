//! Cache store abstraction.

use std::time::Duration;

use super::CacheError;
use super::memory::MemoryCacheStore;
use super::redis_store::RedisCacheStore;

/// Minimal key/value surface the read-through cache needs.
///
/// Values are opaque strings (JSON); TTLs are whole seconds on Redis.
#[trait_variant::make(CacheStore: Send)]
pub trait LocalCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value`, replacing any previous entry, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Atomically increment an integer key (missing counts as 0).
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;
}

/// Store selected at startup.
#[derive(Clone)]
pub enum CacheBackend {
    Redis(RedisCacheStore),
    Memory(MemoryCacheStore),
}

impl CacheStore for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            Self::Redis(store) => CacheStore::get(store, key).await,
            Self::Memory(store) => CacheStore::get(store, key).await,
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        match self {
            Self::Redis(store) => CacheStore::set_ex(store, key, value, ttl).await,
            Self::Memory(store) => CacheStore::set_ex(store, key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::Redis(store) => CacheStore::delete(store, key).await,
            Self::Memory(store) => CacheStore::delete(store, key).await,
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        match self {
            Self::Redis(store) => CacheStore::incr(store, key).await,
            Self::Memory(store) => CacheStore::incr(store, key).await,
        }
    }
}
