//! Persistence of favorites and histories.
//!
//! A [`KeyValueStore`] holds string values with a per-entry lifetime.
//! [`Lists`] keeps the three bounded, de-duplicated lists on top of it.
//! Every mutation reads, modifies and rewrites the whole list.

mod file;
mod lists;
mod memory;

use std::time::Duration;

pub use file::FileStore;
pub use lists::{AddFavorite, FAVORITES_KEY, Lists, ROUTE_HISTORY_KEY, SEARCH_HISTORY_KEY};
pub use memory::MemoryStore;

/// Errors from a key-value store.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage with expiry.
pub trait KeyValueStore: Send + Sync {
    /// Value under `key`, `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), PersistError>;

    /// Delete `key`. Absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}
