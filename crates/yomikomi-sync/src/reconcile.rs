//! One scan-and-merge pass over the site.

use std::path::{Path, PathBuf};

use yomikomi_core::config::AppConfig;
use yomikomi_core::models::Category;

use crate::catalog_file::{read_catalog, write_catalog};
use crate::error::SyncError;
use crate::merge::merge;
use crate::scanner::scan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The image tree had no series folders; the catalog was not touched.
    NoSeries,
    Unchanged,
    Written { added: Vec<String>, updated: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    images_root: PathBuf,
    catalog_path: PathBuf,
    default_category: Category,
}

impl Reconciler {
    pub fn new(
        images_root: impl Into<PathBuf>,
        catalog_path: impl Into<PathBuf>,
        default_category: Category,
    ) -> Self {
        Self {
            images_root: images_root.into(),
            catalog_path: catalog_path.into(),
            default_category,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.images_path(),
            config.catalog_path(),
            Category::from(config.sync.default_category.as_str()),
        )
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    /// Scan, merge, and write the catalog back if anything changed.
    pub fn run_pass(&self) -> Result<PassOutcome, SyncError> {
        let scanned = scan(&self.images_root);
        if scanned.is_empty() {
            tracing::info!(path = %self.images_root.display(), "No series found");
            return Ok(PassOutcome::NoSeries);
        }

        let catalog = read_catalog(&self.catalog_path)?;
        let outcome = merge(&scanned, catalog, &self.default_category);

        if !outcome.changed {
            tracing::info!("No changes found");
            return Ok(PassOutcome::Unchanged);
        }

        write_catalog(&self.catalog_path, &outcome.catalog)?;
        tracing::info!(
            path = %self.catalog_path.display(),
            added = outcome.added.len(),
            updated = outcome.updated.len(),
            "Catalog updated"
        );
        Ok(PassOutcome::Written {
            added: outcome.added,
            updated: outcome.updated,
        })
    }
}
