use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Series category as written in the catalog's `type` field.
///
/// Unknown values are kept verbatim so hand-curated categories survive a
/// read/write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Manga,
    #[default]
    Manhwa,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manga => "manga",
            Self::Manhwa => "manhwa",
            Self::Other(s) => s,
        }
    }

    /// Uppercased label shown on card badges.
    pub fn badge(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "manga" => Self::Manga,
            "manhwa" => Self::Manhwa,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One series in the catalog document.
///
/// `latest_chapter` and `is_new` stay optional so entries that never had
/// them are written back without them. Read them through
/// [`SeriesRecord::latest_chapter_or_zero`] and [`SeriesRecord::is_new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Folder-derived id; storage key and image path segment.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub category: Category,
    #[serde(
        rename = "latestChapter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_chapter: Option<u32>,
    #[serde(rename = "isNew", default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    /// Curated fields this crate does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeriesRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            latest_chapter: None,
            is_new: None,
            extra: Map::new(),
        }
    }

    pub fn with_latest_chapter(mut self, chapter: u32) -> Self {
        self.latest_chapter = Some(chapter);
        self
    }

    pub fn with_new_flag(mut self, is_new: bool) -> Self {
        self.is_new = Some(is_new);
        self
    }

    pub fn latest_chapter_or_zero(&self) -> u32 {
        self.latest_chapter.unwrap_or(0)
    }

    pub fn is_new(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    /// Title for display, falling back to the id when the title is blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}
