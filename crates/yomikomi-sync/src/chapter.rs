//! Chapter number inference from folder and file names.

use std::sync::LazyLock;

use regex::Regex;

/// `ch1`, `ch02`, `chapter 3`, `Chapter07`, `ch 4`, anywhere in the name.
static RE_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ch(?:apter)?\s*0*(\d+)").unwrap());

/// Page images stored directly in a series folder: `1.jpg`, `01.png`, `001.webp`.
static RE_FLAT_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^0*\d{1,3}\.(?:jpg|jpeg|png|webp)$").unwrap());

/// Chapter number named by a chapter folder, if any.
pub fn chapter_from_dir_name(name: &str) -> Option<u32> {
    RE_CHAPTER
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn is_flat_page(file_name: &str) -> bool {
    RE_FLAT_PAGE.is_match(file_name)
}
