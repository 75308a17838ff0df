//! Bounded, de-duplicated user lists.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ListLimits;
use crate::domain::{RouteHistoryEntry, Stop};

use super::{KeyValueStore, PersistError};

pub const SEARCH_HISTORY_KEY: &str = "vvo_search_history";
pub const FAVORITES_KEY: &str = "vvo_favorites";
pub const ROUTE_HISTORY_KEY: &str = "vvo_route_history";

/// Result of adding a favorite. The set is unchanged unless `Added`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFavorite {
    Added,
    AlreadyFavorite,
    Full,
}

/// Search history, favorites and route history.
///
/// - Search history: most recent first, unique by stop id.
/// - Favorites: insertion order, unique by stop id, capped without eviction.
/// - Route history: most recent first, unique by ordered stop pair.
#[derive(Clone)]
pub struct Lists {
    store: Arc<dyn KeyValueStore>,
    limits: ListLimits,
}

impl Lists {
    pub fn new(store: Arc<dyn KeyValueStore>, limits: ListLimits) -> Self {
        Self { store, limits }
    }

    /// Read a list. Missing, unreadable or corrupt values read as empty.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.store.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "discarding corrupt list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "failed to read list");
                Vec::new()
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), PersistError> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, &json, self.limits.ttl)
    }

    pub fn search_history(&self) -> Vec<Stop> {
        self.read(SEARCH_HISTORY_KEY)
    }

    /// Move `stop` to the front of the search history.
    pub fn add_to_search_history(&self, stop: &Stop) -> Result<(), PersistError> {
        let mut history: Vec<Stop> = self.read(SEARCH_HISTORY_KEY);
        history.retain(|s| s.id != stop.id);
        history.insert(0, stop.clone());
        history.truncate(self.limits.search_history);
        self.write(SEARCH_HISTORY_KEY, &history)
    }

    pub fn clear_search_history(&self) -> Result<(), PersistError> {
        self.store.remove(SEARCH_HISTORY_KEY)
    }

    pub fn favorites(&self) -> Vec<Stop> {
        self.read(FAVORITES_KEY)
    }

    /// Append `stop` to the favorites unless present or full.
    pub fn add_favorite(&self, stop: &Stop) -> Result<AddFavorite, PersistError> {
        let mut favorites: Vec<Stop> = self.read(FAVORITES_KEY);
        if favorites.iter().any(|f| f.id == stop.id) {
            return Ok(AddFavorite::AlreadyFavorite);
        }
        if favorites.len() >= self.limits.favorites {
            return Ok(AddFavorite::Full);
        }
        favorites.push(stop.clone());
        self.write(FAVORITES_KEY, &favorites)?;
        Ok(AddFavorite::Added)
    }

    pub fn remove_favorite(&self, stop_id: &str) -> Result<(), PersistError> {
        let mut favorites: Vec<Stop> = self.read(FAVORITES_KEY);
        favorites.retain(|f| f.id != stop_id);
        self.write(FAVORITES_KEY, &favorites)
    }

    pub fn is_favorite(&self, stop_id: &str) -> bool {
        self.favorites().iter().any(|f| f.id == stop_id)
    }

    pub fn route_history(&self) -> Vec<RouteHistoryEntry> {
        self.read(ROUTE_HISTORY_KEY)
    }

    /// Move the `origin → destination` search to the front of the route
    /// history. `B → A` is a different entry from `A → B`.
    pub fn add_to_route_history(
        &self,
        origin: &Stop,
        destination: &Stop,
        searched_at: DateTime<Utc>,
    ) -> Result<(), PersistError> {
        let entry = RouteHistoryEntry::new(origin.clone(), destination.clone(), searched_at);
        let mut history: Vec<RouteHistoryEntry> = self.read(ROUTE_HISTORY_KEY);
        history.retain(|r| r.id != entry.id);
        history.insert(0, entry);
        history.truncate(self.limits.route_history);
        self.write(ROUTE_HISTORY_KEY, &history)
    }

    pub fn clear_route_history(&self) -> Result<(), PersistError> {
        self.store.remove(ROUTE_HISTORY_KEY)
    }
}
