//! Site-relative path and link conventions.
//!
//! Covers live at `Images/<id>/cover.jpg`, pages at
//! `Images/<id>/ch<chapter>/<NN>.jpg` with a two-digit zero-padded page
//! number, and the reader is addressed as `reader.html?series=..&chapter=..`.

use url::{form_urlencoded, Url};

/// Top-level image directory, relative to the site root.
pub const IMAGES_ROOT: &str = "Images";

/// Reader page, relative to the site root.
pub const READER_PAGE: &str = "reader.html";

pub fn cover_path(series_id: &str) -> String {
    format!("{IMAGES_ROOT}/{series_id}/cover.jpg")
}

pub fn chapter_dir(series_id: &str, chapter: u32) -> String {
    format!("{IMAGES_ROOT}/{series_id}/ch{chapter}")
}

/// Page numbers past 99 simply widen (`100.jpg`).
pub fn page_path(series_id: &str, chapter: u32, page: u32) -> String {
    format!("{}/{page:02}.jpg", chapter_dir(series_id, chapter))
}

pub fn reader_url(series_id: &str, chapter: u32) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("series", series_id)
        .append_pair("chapter", &chapter.to_string())
        .finish();
    format!("{READER_PAGE}?{query}")
}

/// Treat `base` as a directory so relative joins keep its last segment:
/// `https://host/site` resolves `manga.json` to `https://host/site/manga.json`.
pub fn site_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
