//! Plain-text rendering of core view types.

use std::path::PathBuf;

use yomikomi_core::filter::Card;
use yomikomi_core::hero::HeroBanner;
use yomikomi_core::reader::{ReaderEvent, ReaderSink};

pub fn print_banner(banner: &HeroBanner) {
    let tag = if banner.show_new_tag { " [NEW]" } else { "" };
    println!("== {}{tag} ==", banner.title);
    println!("{}", banner.subtitle);
    println!("{}", banner.read_href);
    println!();
}

pub fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No series match.");
        return;
    }
    for card in cards {
        println!(
            "{} {:<32} [{}]  {}  ({})",
            card.favorite.glyph(),
            card.title,
            card.badge,
            card.link.label,
            card.link.href
        );
    }
}

/// Prints pages as they load, optionally saving them to disk.
pub struct PagePrinter {
    out: Option<PathBuf>,
}

impl PagePrinter {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }
}

impl ReaderSink for PagePrinter {
    fn emit(&mut self, event: ReaderEvent) {
        match event {
            ReaderEvent::Page(page) => {
                println!("  page {:02}  {} ({} bytes)", page.number, page.path, page.bytes.len());
                if let Some(dir) = &self.out {
                    let target = dir.join(format!("{:02}.jpg", page.number));
                    if let Err(e) = std::fs::write(&target, &page.bytes) {
                        tracing::warn!(path = %target.display(), error = %e, "Failed to save page");
                    }
                }
            }
            other => {
                if let Some(message) = other.message() {
                    println!("{message}");
                }
            }
        }
    }
}
