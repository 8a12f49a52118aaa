//! Image tree scanner.
//!
//! One top-level folder per series. A series' latest chapter is the highest
//! number among its chapter folders; a series with no chapter folder but
//! with page images lying directly inside counts as chapter 1.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::chapter::{chapter_from_dir_name, is_flat_page};

/// Series folder name → detected latest chapter.
pub type ScanResult = BTreeMap<String, u32>;

/// Scan `images_root`. Best effort: unreadable folders are skipped and a
/// missing root yields an empty result.
pub fn scan(images_root: &Path) -> ScanResult {
    let mut out = ScanResult::new();

    if !images_root.is_dir() {
        tracing::error!(path = %images_root.display(), "Images directory not found");
        return out;
    }

    for entry in children(images_root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read images directory entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        // Non UTF-8 names are kept, with invalid bytes replaced.
        let name = entry.file_name().to_string_lossy().into_owned();

        match latest_chapter(entry.path()) {
            Ok(chapter) => {
                tracing::debug!(series = %name, chapter, "Scanned series");
                out.insert(name, chapter);
            }
            Err(e) => {
                tracing::warn!(series = %name, error = %e, "Skipping unreadable series folder");
            }
        }
    }

    out
}

/// Highest chapter found in one series folder, 0 when it has no content.
///
/// Fails only when the folder itself cannot be read; unreadable entries
/// inside it (such as dangling symlinks) are skipped.
pub fn latest_chapter(series_dir: &Path) -> Result<u32, walkdir::Error> {
    let mut items = Vec::new();
    for entry in children(series_dir) {
        match entry {
            Ok(e) => items.push(e),
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                tracing::warn!(
                    path = %series_dir.display(),
                    error = %e,
                    "Skipping unreadable entry"
                );
            }
        }
    }

    let from_folders = items
        .iter()
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| chapter_from_dir_name(&e.file_name().to_string_lossy()))
        .max()
        .unwrap_or(0);
    if from_folders > 0 {
        return Ok(from_folders);
    }

    let has_flat_pages = items.iter().any(|e| {
        e.file_type().is_file() && e.file_name().to_str().is_some_and(is_flat_page)
    });
    Ok(u32::from(has_flat_pages))
}

fn children(dir: &Path) -> impl Iterator<Item = Result<DirEntry, walkdir::Error>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
}
