//! Favorited series ids, persisted as a JSON array under `favorites`.
//!
//! Corrupt stored JSON reads as an empty set and write failures are logged,
//! so a broken local store never breaks the page.

use crate::kv::{KeyValueStore, FAVORITES_KEY};

pub struct Favorites<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Favorites<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Favorited ids in insertion order, without duplicates.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut ids) => {
                dedup_in_order(&mut ids);
                ids
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored favorites are malformed, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|f| f == id)
    }

    /// Returns `true` if the id was not already a favorite.
    pub fn add(&self, id: &str) -> bool {
        let mut ids = self.list();
        if ids.iter().any(|f| f == id) {
            return false;
        }
        ids.push(id.to_string());
        self.save(&ids);
        true
    }

    /// Returns `true` if the id was a favorite.
    pub fn remove(&self, id: &str) -> bool {
        let mut ids = self.list();
        let Some(pos) = ids.iter().position(|f| f == id) else {
            return false;
        };
        ids.remove(pos);
        self.save(&ids);
        true
    }

    /// Flip membership; returns the new state.
    pub fn toggle(&self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    fn save(&self, ids: &[String]) {
        let json = match serde_json::to_string(ids) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.store.set(FAVORITES_KEY, &json) {
            tracing::warn!(error = %e, "Failed to save favorites");
        }
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
