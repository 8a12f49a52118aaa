//! Reader URL parameters and chapter-to-chapter navigation.

use url::form_urlencoded;

use crate::paths;

/// Parameters of a reader page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderQuery {
    pub series: Option<String>,
    pub chapter: u32,
}

impl ReaderQuery {
    /// Parse `series` and `chapter` from a reader URL or bare query string.
    ///
    /// `chapter` defaults to 1 when absent, non-numeric or below 1.
    pub fn parse(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, q)) => q,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut series = None;
        let mut chapter = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "series" if series.is_none() => series = Some(value.into_owned()),
                "chapter" if chapter.is_none() => chapter = Some(parse_chapter(&value)),
                _ => {}
            }
        }

        Self {
            series: series.filter(|s| !s.is_empty()),
            chapter: chapter.unwrap_or(1),
        }
    }
}

/// Leading-digit parse, like a lenient integer read: `"3abc"` and `"+3"` are 3.
fn parse_chapter(raw: &str) -> u32 {
    let raw = raw.trim();
    let digits: String = raw
        .strip_prefix('+')
        .unwrap_or(raw)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }

    /// Arrow-key binding: left goes back, right goes forward.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// A full reload of the reader at another chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub chapter: u32,
    pub url: String,
}

/// Moves between chapters of one series.
///
/// Chapter 1 is a hard floor; there is no upper bound, so stepping past the
/// last real chapter lands on an empty reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterNavigator {
    series_id: String,
    current: u32,
}

impl ChapterNavigator {
    pub fn new(series_id: impl Into<String>, current: u32) -> Self {
        Self {
            series_id: series_id.into(),
            current,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn go(&self, direction: Direction) -> Option<Navigation> {
        let next = i64::from(self.current) + direction.delta();
        if next < 1 {
            return None;
        }
        let chapter = u32::try_from(next).ok()?;
        Some(Navigation {
            chapter,
            url: paths::reader_url(&self.series_id, chapter),
        })
    }

    pub fn handle_key(&self, key: &str) -> Option<Navigation> {
        Direction::from_key(key).and_then(|d| self.go(d))
    }
}
