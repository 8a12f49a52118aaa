use std::cmp::Reverse;

use crate::models::SeriesRecord;
use crate::paths;

/// Featured release shown in the homepage banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroBanner {
    pub series_id: String,
    pub title: String,
    pub subtitle: String,
    pub background: String,
    pub read_href: String,
    pub show_new_tag: bool,
}

/// Pick the featured series.
///
/// The first record flagged new wins. Otherwise the highest
/// `latest_chapter` wins, with ties going to the earlier record and a
/// missing chapter counting as 0.
pub fn select_featured(records: &[SeriesRecord]) -> Option<&SeriesRecord> {
    records
        .iter()
        .find(|r| r.is_new())
        .or_else(|| records.iter().min_by_key(|r| Reverse(r.latest_chapter_or_zero())))
}

/// Banner contents for the featured series; `None` leaves the banner as is.
pub fn hero_banner(records: &[SeriesRecord]) -> Option<HeroBanner> {
    let Some(release) = select_featured(records) else {
        tracing::debug!("Catalog is empty, leaving hero banner unchanged");
        return None;
    };

    let chapter = match release.latest_chapter_or_zero() {
        0 => 1,
        n => n,
    };

    Some(HeroBanner {
        series_id: release.id.clone(),
        title: release.display_title().to_string(),
        subtitle: format!("Chapter {chapter} is out now!"),
        background: paths::cover_path(&release.id),
        read_href: paths::reader_url(&release.id, chapter),
        show_new_tag: release.is_new(),
    })
}
