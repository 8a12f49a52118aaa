use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::YomikomiError;
use crate::paths;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Name of the optional per-site config file, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "yomikomi.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub sync: SyncConfig,
    pub accounts: AccountsConfig,
}

/// Where the static site lives and how its assets are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub images_dir: String,
    pub catalog_file: String,
    /// Remote origin for the catalog document and page images.
    pub base_url: Option<String>,
    pub placeholder_cover: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub debounce_ms: u64,
    pub default_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    pub authorized_uploaders: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            images_dir: "Images".into(),
            catalog_file: "manga.json".into(),
            base_url: None,
            placeholder_cover: "https://via.placeholder.com/300?text=Cover+Missing".into(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 600,
            default_category: "manhwa".into(),
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            authorized_uploaders: vec!["admin".into(), "uploader".into(), "marco".into()],
        }
    }
}

impl AppConfig {
    /// Load config: `yomikomi.toml` in the working directory, else the user
    /// file, else the built-in defaults.
    pub fn load() -> Result<Self, YomikomiError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        let user_path = Self::config_path();
        if user_path.exists() {
            return Self::load_from(&user_path);
        }

        Self::builtin()
    }

    /// Parse a config file; missing keys fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, YomikomiError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| YomikomiError::Config(e.to_string()))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| YomikomiError::Config(e.to_string()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// The embedded `config/default.toml`.
    pub fn builtin() -> Result<Self, YomikomiError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| YomikomiError::Config(e.to_string()))
    }

    /// Parsed `site.base_url`, normalized to end with `/` so relative
    /// catalog and page paths resolve under it.
    pub fn base_url(&self) -> Result<Option<Url>, YomikomiError> {
        self.site
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map(paths::site_base))
            .transpose()
            .map_err(Into::into)
    }

    /// Absolute-or-relative path to the image tree.
    pub fn images_path(&self) -> PathBuf {
        self.site.root.join(&self.site.images_dir)
    }

    /// Path to the catalog JSON document.
    pub fn catalog_path(&self) -> PathBuf {
        self.site.root.join(&self.site.catalog_file)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the local key-value database.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("yomikomi.db"))
            .unwrap_or_else(|| PathBuf::from("yomikomi.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, YomikomiError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "yomikomi")
    }
}
