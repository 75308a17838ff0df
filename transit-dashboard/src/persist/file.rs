//! Disk-based store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{KeyValueStore, PersistError};

/// One stored value with its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredValue {
    value: String,
    /// Unix timestamp after which the value is gone.
    expires_at_secs: u64,
}

type Document = HashMap<String, StoredValue>;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Store backed by a single JSON file.
///
/// A missing or unreadable file counts as empty. Writes rewrite the whole
/// file; the mutex serializes read-modify-write within this process only.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Document {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return Document::new();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt store file");
            Document::new()
        })
    }

    fn save(&self, doc: &Document) -> Result<(), PersistError> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn with_document<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T, PersistError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut doc = self.load();
        let now = now_secs();
        doc.retain(|_, v| v.expires_at_secs > now);
        let out = f(&mut doc);
        self.save(&doc)?;
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let now = now_secs();
        Ok(self
            .load()
            .remove(key)
            .filter(|v| v.expires_at_secs > now)
            .map(|v| v.value))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), PersistError> {
        let stored = StoredValue {
            value: value.to_string(),
            expires_at_secs: now_secs().saturating_add(ttl.as_secs()),
        };
        self.with_document(|doc| {
            doc.insert(key.to_string(), stored);
        })
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.with_document(|doc| {
            doc.remove(key);
        })
    }
}
