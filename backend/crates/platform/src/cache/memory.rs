//! In-process cache store.
//!
//! Used when no Redis URL is configured and in tests. Expiry follows tokio's
//! clock, so paused-time tests can step past a TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use super::CacheError;
use super::store::CacheStore;

/// Full expiry sweep after this many writes. Reads only check the key they touch.
const SWEEP_EVERY: usize = 256;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, Entry>,
    writes: usize,
}

impl Entries {
    /// Live entry for `key`; an expired one is dropped on the way.
    fn live(&mut self, key: &str, now: Instant) -> Option<&mut Entry> {
        if self.map.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.map.remove(key);
        }
        self.map.get_mut(key)
    }

    fn note_write(&mut self, now: Instant) {
        self.writes += 1;
        if self.writes >= SWEEP_EVERY {
            self.writes = 0;
            self.map.retain(|_, entry| entry.is_live(now));
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut Entries, Instant) -> R,
    ) -> Result<R, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(f(&mut entries, Instant::now()))
    }

    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries.lock().map(|entries| entries.map.len()).unwrap_or(0)
    }
}

impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.with_entries(|entries, now| entries.live(key, now).map(|entry| entry.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.with_entries(|entries, now| {
            entries.map.insert(
                key.to_string(),
                Entry {
                    value,
                    expires_at: Some(now + ttl),
                },
            );
            entries.note_write(now);
        })
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.with_entries(|entries, _| {
            entries.map.remove(key);
        })
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        self.with_entries(|entries, now| {
            let next = entries
                .live(key, now)
                .and_then(|entry| entry.value.parse::<i64>().ok())
                .unwrap_or(0)
                + 1;
            let entry = entries.map.entry(key.to_string()).or_insert(Entry {
                value: String::new(),
                expires_at: None,
            });
            entry.value = next.to_string();
            entries.note_write(now);
            next
        })
    }
}
