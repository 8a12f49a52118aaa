//! Persistent string-keyed store, the local-storage seam.
//!
//! Reads and writes are synchronous; concurrent writers to the same key are
//! last-write-wins.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::YomikomiError;

/// Key holding the JSON array of favorited series ids.
pub const FAVORITES_KEY: &str = "favorites";

/// Key holding the logged-in username.
pub const USER_KEY: &str = "user";

/// Prefix for per-series reading progress (`progress_<id>`).
pub const PROGRESS_PREFIX: &str = "progress_";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, YomikomiError>;

    fn set(&self, key: &str, value: &str) -> Result<(), YomikomiError>;

    fn remove(&self, key: &str) -> Result<(), YomikomiError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, YomikomiError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), YomikomiError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), YomikomiError> {
        self.lock().remove(key);
        Ok(())
    }
}
