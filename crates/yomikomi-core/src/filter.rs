//! Catalog filtering and card building.
//!
//! A view is always rebuilt from scratch: filter the catalog, then build one
//! card per surviving record in catalog order.

use std::str::FromStr;

use crate::models::{Category, SeriesRecord};
use crate::paths;

pub const FAVORITE_GLYPH: &str = "♥";
pub const NOT_FAVORITE_GLYPH: &str = "♡";

/// Category selector, including the `all` and `favorites` pseudo-categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Favorites,
    Only(Category),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Favorites => "favorites",
            Self::Only(c) => c.as_str(),
        }
    }

    /// Id of the filter button that should be highlighted.
    pub fn button_id(&self) -> String {
        format!("btn-{}", self.as_str())
    }

    fn admits(&self, record: &SeriesRecord) -> bool {
        match self {
            Self::All | Self::Favorites => true,
            Self::Only(c) => record.category == *c,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => Self::All,
            "favorites" => Self::Favorites,
            other => Self::Only(Category::from(other)),
        })
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current homepage query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub category: CategoryFilter,
    pub search: String,
}

impl ViewState {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }
}

/// Records matching `view`, in catalog order.
///
/// Category and case-insensitive title search are applied together; the
/// favorites view additionally keeps only ids in `favorites`.
pub fn filter_records<'a>(
    records: &'a [SeriesRecord],
    view: &ViewState,
    favorites: &[String],
) -> Vec<&'a SeriesRecord> {
    let needle = view.search.to_lowercase();
    records
        .iter()
        .filter(|r| view.category.admits(r))
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .filter(|r| {
            view.category != CategoryFilter::Favorites || favorites.iter().any(|f| *f == r.id)
        })
        .collect()
}

/// Cover image with its error fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub src: String,
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteButton {
    pub series_id: String,
    pub active: bool,
}

impl FavoriteButton {
    pub fn glyph(&self) -> &'static str {
        if self.active {
            FAVORITE_GLYPH
        } else {
            NOT_FAVORITE_GLYPH
        }
    }

    pub fn tooltip(&self) -> &'static str {
        if self.active {
            "Remove from favorites"
        } else {
            "Add to favorites"
        }
    }
}

/// Read or continue link on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLink {
    pub label: String,
    pub href: String,
    pub chapter: u32,
    /// Set when the link resumes stored progress.
    pub continuing: bool,
}

impl ReadLink {
    pub fn for_series(series_id: &str, progress: Option<u32>) -> Self {
        match progress {
            Some(chapter) => Self {
                label: format!("▶ Continue Ch {chapter}"),
                href: paths::reader_url(series_id, chapter),
                chapter,
                continuing: true,
            },
            None => Self {
                label: "Read Chapter 1".into(),
                href: paths::reader_url(series_id, 1),
                chapter: 1,
                continuing: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub series_id: String,
    pub title: String,
    pub badge: String,
    pub cover: CoverImage,
    pub favorite: FavoriteButton,
    pub link: ReadLink,
}

impl Card {
    pub fn build(
        record: &SeriesRecord,
        is_favorite: bool,
        progress: Option<u32>,
        placeholder_cover: &str,
    ) -> Self {
        Self {
            series_id: record.id.clone(),
            title: record.title.clone(),
            badge: record.category.badge(),
            cover: CoverImage {
                src: paths::cover_path(&record.id),
                fallback: placeholder_cover.to_string(),
            },
            favorite: FavoriteButton {
                series_id: record.id.clone(),
                active: is_favorite,
            },
            link: ReadLink::for_series(&record.id, progress),
        }
    }
}
