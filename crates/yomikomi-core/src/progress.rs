use crate::kv::{KeyValueStore, PROGRESS_PREFIX};

/// Last chapter *entered* per series, stored as `progress_<id>` → chapter.
///
/// Written whenever a reader session starts, whether or not any page loads.
pub struct Progress<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Progress<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn get(&self, series_id: &str) -> Option<u32> {
        let raw = match self.store.get(&progress_key(series_id)) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(series = %series_id, error = %e, "Failed to read progress");
                return None;
            }
        };
        match raw.trim().parse::<u32>() {
            Ok(chapter) if chapter >= 1 => Some(chapter),
            _ => {
                tracing::debug!(series = %series_id, value = %raw, "Ignoring invalid stored progress");
                None
            }
        }
    }

    /// Overwrites any previous value.
    pub fn set(&self, series_id: &str, chapter: u32) {
        if let Err(e) = self
            .store
            .set(&progress_key(series_id), &chapter.to_string())
        {
            tracing::warn!(series = %series_id, chapter, error = %e, "Failed to save progress");
        }
    }
}

fn progress_key(series_id: &str) -> String {
    format!("{PROGRESS_PREFIX}{series_id}")
}
