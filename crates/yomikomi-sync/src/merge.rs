//! Merging scan results into the catalog.
//!
//! Entries are never removed and fields the scan knows nothing about are left
//! alone, so hand edits to the catalog survive every pass.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use yomikomi_core::models::{Category, SeriesRecord};

use crate::scanner::ScanResult;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub catalog: Vec<SeriesRecord>,
    /// At least one entry was added or modified.
    pub changed: bool,
    /// Ids of entries created by this merge.
    pub added: Vec<String>,
    /// Ids of entries whose latest chapter was bumped.
    pub updated: Vec<String>,
}

/// Catalog id for a new series folder: whitespace runs become `_`, lowercased.
pub fn normalize_id(folder: &str) -> String {
    RE_WHITESPACE.replace_all(folder, "_").to_lowercase()
}

/// Comparison key ignoring case, underscores, dashes and whitespace.
fn relaxed(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Merge `scanned` into `catalog`.
///
/// A folder matches an entry by case-insensitive id, else by [`relaxed`]
/// comparison. Matched entries get their chapter bumped and `isNew` set when
/// the scan found more; when the scan found fewer, a set `isNew` is cleared.
/// Unmatched folders become new entries in `default_category`.
pub fn merge(
    scanned: &ScanResult,
    catalog: Vec<SeriesRecord>,
    default_category: &Category,
) -> MergeOutcome {
    let mut out = MergeOutcome {
        catalog,
        ..Default::default()
    };

    let mut by_id: HashMap<String, usize> = out
        .catalog
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.to_lowercase(), i))
        .collect();

    for (folder, &detected) in scanned {
        let key = folder.to_lowercase();
        let matched = by_id.get(&key).copied().or_else(|| {
            let wanted = relaxed(&key);
            out.catalog.iter().position(|r| relaxed(&r.id) == wanted)
        });

        let Some(index) = matched else {
            let record = SeriesRecord::new(
                normalize_id(folder),
                folder.as_str(),
                default_category.clone(),
            )
            .with_latest_chapter(detected)
            .with_new_flag(true);
            tracing::info!(id = %record.id, chapter = detected, "Added new series to catalog");

            by_id.insert(record.id.to_lowercase(), out.catalog.len());
            out.added.push(record.id.clone());
            out.catalog.push(record);
            out.changed = true;
            continue;
        };

        let entry = &mut out.catalog[index];
        let previous = entry.latest_chapter_or_zero();
        if detected > previous {
            entry.latest_chapter = Some(detected);
            entry.is_new = Some(true);
            tracing::info!(id = %entry.id, chapter = detected, "Updated latest chapter");
            out.updated.push(entry.id.clone());
            out.changed = true;
        } else if detected < previous && entry.is_new() {
            entry.is_new = Some(false);
            tracing::debug!(id = %entry.id, "Cleared new flag");
            out.changed = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(entries: &[(&str, u32)]) -> ScanResult {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn record(id: &str, chapter: u32, is_new: Option<bool>) -> SeriesRecord {
        SeriesRecord {
            is_new,
            ..SeriesRecord::new(id, id, Category::Manga).with_latest_chapter(chapter)
        }
    }

    #[test]
    fn test_new_folder_creates_entry() {
        let out = merge(&scan(&[("My Series", 4)]), Vec::new(), &Category::Manhwa);

        assert!(out.changed);
        assert_eq!(out.added, vec!["my_series"]);
        let entry = &out.catalog[0];
        assert_eq!(entry.id, "my_series");
        assert_eq!(entry.title, "My Series");
        assert_eq!(entry.category, Category::Manhwa);
        assert_eq!(entry.latest_chapter, Some(4));
        assert_eq!(entry.is_new, Some(true));
    }

    #[test]
    fn test_second_merge_is_idempotent() {
        let scanned = scan(&[("My Series", 4), ("solo", 2)]);
        let first = merge(&scanned, vec![record("solo", 1, None)], &Category::Manhwa);
        assert!(first.changed);

        let second = merge(&scanned, first.catalog.clone(), &Category::Manhwa);
        assert!(!second.changed);
        assert_eq!(second.catalog, first.catalog);
    }

    #[test]
    fn test_case_insensitive_match() {
        let catalog = vec![record("solo", 3, None)];
        let out = merge(&scan(&[("SOLO", 5)]), catalog, &Category::Manhwa);
        assert_eq!(out.catalog.len(), 1);
        assert_eq!(out.updated, vec!["solo"]);
        assert_eq!(out.catalog[0].latest_chapter, Some(5));
        assert!(out.catalog[0].is_new());
    }

    #[test]
    fn test_relaxed_match() {
        let out = merge(
            &scan(&[("tower-of god", 2)]),
            vec![record("Tower_Of_God", 2, None)],
            &Category::Manhwa,
        );
        assert_eq!(out.catalog.len(), 1);
        assert!(!out.changed);
    }

    #[test]
    fn test_never_deletes_entries() {
        let catalog = vec![record("gone", 10, Some(true)), record("solo", 1, None)];
        let out = merge(&scan(&[("solo", 1)]), catalog, &Category::Manhwa);

        let ids: Vec<&str> = out.catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["gone", "solo"]);
        assert!(out.catalog[0].is_new());
    }

    #[test]
    fn test_equal_chapter_keeps_new_flag() {
        let catalog = vec![record("solo", 3, Some(true))];
        let out = merge(&scan(&[("solo", 3)]), catalog, &Category::Manhwa);
        assert!(!out.changed);
        assert_eq!(out.catalog[0].is_new, Some(true));
    }

    #[test]
    fn test_lower_scan_clears_new_flag() {
        let catalog = vec![record("solo", 3, Some(true))];
        let out = merge(&scan(&[("solo", 2)]), catalog, &Category::Manhwa);
        assert!(out.changed);
        assert_eq!(out.catalog[0].is_new, Some(false));
        assert_eq!(out.catalog[0].latest_chapter, Some(3));
        assert!(out.updated.is_empty());
    }

    #[test]
    fn test_lower_scan_without_flag_is_unchanged() {
        let catalog = vec![record("solo", 3, None)];
        let out = merge(&scan(&[("solo", 0)]), catalog, &Category::Manhwa);
        assert!(!out.changed);
        assert_eq!(out.catalog[0].is_new, None);
    }

    #[test]
    fn test_two_folders_same_relaxed_id_merge_into_one() {
        let scanned = scan(&[("My Series", 1), ("my_series", 2)]);
        let out = merge(&scanned, Vec::new(), &Category::Manhwa);
        assert_eq!(out.catalog.len(), 1);
        assert_eq!(out.catalog[0].latest_chapter, Some(2));
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("My  Cool\tSeries"), "my_cool_series");
        assert_eq!(normalize_id("Already_ok"), "already_ok");
    }
}
