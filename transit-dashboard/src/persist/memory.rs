//! In-memory store.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::{KeyValueStore, PersistError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expire each entry after its own TTL, counted from its last write.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Process-local store backed by a moka cache. Contents are lost on exit.
pub struct MemoryStore {
    entries: Cache<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(1024)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).map(|e| e.value))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), PersistError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl,
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries.invalidate(key);
        Ok(())
    }
}
