//! Catalog loading.
//!
//! The catalog document is fetched once per page load. Any transport or
//! parse failure falls back to a small built-in list so the page always has
//! something to show.

use std::future::Future;
use std::path::PathBuf;

use reqwest::Client;
use url::Url;

use crate::error::YomikomiError;
use crate::models::{Category, SeriesRecord};
use crate::paths;

/// Where the catalog document comes from.
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog. Single attempt, no retry.
    fn fetch(&self) -> impl Future<Output = Result<Vec<SeriesRecord>, YomikomiError>> + Send;
}

/// Catalog served over HTTP next to the site pages.
pub struct HttpCatalogSource {
    url: Url,
    http: Client,
}

impl HttpCatalogSource {
    /// `base` is the site root; `catalog_file` is resolved under it.
    pub fn new(base: &Url, catalog_file: &str) -> Result<Self, YomikomiError> {
        Ok(Self {
            url: paths::site_base(base.clone()).join(catalog_file)?,
            http: Client::new(),
        })
    }

    /// Use a shared client instead of a dedicated one.
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<SeriesRecord>, YomikomiError> {
        let resp = self.http.get(self.url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(YomikomiError::Status {
                status: resp.status().as_u16(),
                url: self.url.to_string(),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Catalog read straight from the site directory.
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Vec<SeriesRecord>, YomikomiError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Entries used when the catalog document cannot be loaded.
pub fn fallback_catalog() -> Vec<SeriesRecord> {
    vec![
        SeriesRecord::new("dick", "Dick", Category::Manhwa),
        SeriesRecord::new(
            "La_triste_vida_de_helen",
            "La triste vida de helen ",
            Category::Manhwa,
        ),
    ]
}

/// In-memory catalog for the lifetime of one page.
///
/// Populated once by [`CatalogStore::load`], read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<SeriesRecord>,
    fallback: bool,
}

impl CatalogStore {
    /// Load the catalog from `source`, falling back to [`fallback_catalog`]
    /// on any failure. Never fails.
    pub async fn load<S: CatalogSource>(source: &S) -> Self {
        match source.fetch().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "Loaded catalog");
                Self {
                    records,
                    fallback: false,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load manga list, using built-in fallback");
                Self {
                    records: fallback_catalog(),
                    fallback: true,
                }
            }
        }
    }

    pub fn from_records(records: Vec<SeriesRecord>) -> Self {
        Self {
            records,
            fallback: false,
        }
    }

    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    /// Whether the built-in fallback is in use.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn find(&self, id: &str) -> Option<&SeriesRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Catalog title for `id`, or the id itself when it is not in the catalog.
    pub fn title_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.find(id).map(|r| r.title.as_str()).unwrap_or(id)
    }
}
