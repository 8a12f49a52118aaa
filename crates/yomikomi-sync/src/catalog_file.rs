//! Reading and writing the catalog document on disk.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use yomikomi_core::models::SeriesRecord;

use crate::error::SyncError;

/// Read the catalog. A missing or blank file is an empty catalog; a file
/// that does not parse is an error, so it is never overwritten.
pub fn read_catalog(path: &Path) -> Result<Vec<SeriesRecord>, SyncError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Catalog file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Write the catalog as JSON indented with four spaces.
pub fn write_catalog(path: &Path, catalog: &[SeriesRecord]) -> Result<(), SyncError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog.serialize(&mut ser)?;
    std::fs::write(path, buf)?;
    tracing::debug!(path = %path.display(), entries = catalog.len(), "Wrote catalog");
    Ok(())
}
