//! Sequential page loader.
//!
//! A chapter never declares its length. Pages `01`, `02`, ... are probed one
//! at a time and each hit is emitted before the next probe starts; the first
//! miss ends the chapter. A miss on page 1 means the chapter is empty.
//!
//! ```text
//! Probing(n) --hit--> emit Page(n), Probing(n + 1)
//! Probing(1) --miss-> emit NoImages, Empty
//! Probing(n) --miss-> emit EndOfChapter, Done { pages: n - 1 }
//! ```

use std::future::Future;
use std::path::PathBuf;

use reqwest::Client;
use url::Url;

use crate::catalog::CatalogStore;
use crate::error::YomikomiError;
use crate::kv::KeyValueStore;
use crate::navigator::{ChapterNavigator, ReaderQuery};
use crate::paths;
use crate::progress::Progress;

pub const NO_IMAGES_MESSAGE: &str = "No images found.\nUse 01.jpg, 02.jpg...";
pub const END_OF_CHAPTER_MESSAGE: &str = "— END OF CHAPTER —";

/// Loads a single page image by site-relative path.
///
/// Every error counts as "page does not exist"; there are no retries.
pub trait PageProbe: Send + Sync {
    fn probe(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, YomikomiError>> + Send;
}

/// Probe pages over HTTP relative to the site origin.
pub struct HttpPageProbe {
    base: Url,
    http: Client,
}

impl HttpPageProbe {
    pub fn new(base: Url) -> Self {
        Self {
            base: paths::site_base(base),
            http: Client::new(),
        }
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

impl PageProbe for HttpPageProbe {
    async fn probe(&self, path: &str) -> Result<Vec<u8>, YomikomiError> {
        let url = self.base.join(path)?;
        let resp = self.http.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(YomikomiError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Probe pages in a local copy of the site.
pub struct FsPageProbe {
    root: PathBuf,
}

impl FsPageProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PageProbe for FsPageProbe {
    async fn probe(&self, path: &str) -> Result<Vec<u8>, YomikomiError> {
        Ok(tokio::fs::read(self.root.join(path)).await?)
    }
}

/// A resolved page, in the order it was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub number: u32,
    pub path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    Page(PageImage),
    EndOfChapter,
    NoImages,
}

impl ReaderEvent {
    /// Text for the terminal markers.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Page(_) => None,
            Self::EndOfChapter => Some(END_OF_CHAPTER_MESSAGE),
            Self::NoImages => Some(NO_IMAGES_MESSAGE),
        }
    }
}

/// Receives reader output in order.
pub trait ReaderSink {
    fn emit(&mut self, event: ReaderEvent);
}

impl ReaderSink for Vec<ReaderEvent> {
    fn emit(&mut self, event: ReaderEvent) {
        self.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Next page number to probe.
    Probing(u32),
    Empty,
    Done { pages: u32 },
}

/// One chapter view. Linear: once terminal, it stays terminal.
#[derive(Debug, Clone)]
pub struct ReaderSession {
    series_id: String,
    chapter: u32,
    state: LoaderState,
}

impl ReaderSession {
    /// Start a session, recording `chapter` as the series' progress before
    /// anything is probed.
    pub fn begin(series_id: impl Into<String>, chapter: u32, progress: &Progress<'_>) -> Self {
        let series_id = series_id.into();
        progress.set(&series_id, chapter);
        tracing::info!(series = %series_id, chapter, "Opening chapter");
        Self {
            series_id,
            chapter,
            state: LoaderState::Probing(1),
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoaderState::Probing(_))
    }

    /// Page number the next probe targets.
    pub fn page_cursor(&self) -> Option<u32> {
        match self.state {
            LoaderState::Probing(n) => Some(n),
            _ => None,
        }
    }

    /// Path of the next page to probe.
    pub fn next_path(&self) -> Option<String> {
        self.page_cursor()
            .map(|n| paths::page_path(&self.series_id, self.chapter, n))
    }

    /// Feed the outcome of probing [`Self::next_path`]. Returns `None` once
    /// the session is terminal.
    pub fn advance(&mut self, outcome: Result<Vec<u8>, YomikomiError>) -> Option<ReaderEvent> {
        let LoaderState::Probing(n) = self.state else {
            return None;
        };

        match outcome {
            Ok(bytes) => {
                let path = paths::page_path(&self.series_id, self.chapter, n);
                self.state = LoaderState::Probing(n + 1);
                Some(ReaderEvent::Page(PageImage {
                    number: n,
                    path,
                    bytes,
                }))
            }
            Err(e) if n == 1 => {
                tracing::info!(series = %self.series_id, chapter = self.chapter, error = %e, "No images found");
                self.state = LoaderState::Empty;
                Some(ReaderEvent::NoImages)
            }
            Err(e) => {
                tracing::info!(
                    series = %self.series_id,
                    chapter = self.chapter,
                    pages = n - 1,
                    error = %e,
                    "End of chapter"
                );
                self.state = LoaderState::Done { pages: n - 1 };
                Some(ReaderEvent::EndOfChapter)
            }
        }
    }

    /// Probe until the first miss, emitting every event to `sink`.
    ///
    /// Probe `n + 1` is only issued after probe `n` has resolved.
    pub async fn run<P, S>(&mut self, probe: &P, sink: &mut S) -> LoaderState
    where
        P: PageProbe,
        S: ReaderSink + ?Sized,
    {
        while let Some(path) = self.next_path() {
            tracing::debug!(path = %path, "Probing page");
            let outcome = probe.probe(&path).await;
            if let Some(event) = self.advance(outcome) {
                sink.emit(event);
            }
        }
        self.state
    }
}

/// Everything the reader page shows besides the images.
#[derive(Debug, Clone)]
pub struct ReaderPage {
    pub heading: String,
    pub session: ReaderSession,
    pub navigator: ChapterNavigator,
}

impl ReaderPage {
    /// Resolve the reader URL against the catalog and start a session.
    pub fn open(
        query: &ReaderQuery,
        catalog: &CatalogStore,
        store: &dyn KeyValueStore,
    ) -> Result<Self, YomikomiError> {
        let series = query
            .series
            .as_deref()
            .ok_or_else(|| YomikomiError::Validation("missing series parameter".into()))?;

        let heading = format!("{} - Ch {}", catalog.title_for(series), query.chapter);
        let session = ReaderSession::begin(series, query.chapter, &Progress::new(store));

        Ok(Self {
            heading,
            session,
            navigator: ChapterNavigator::new(series, query.chapter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::models::{Category, SeriesRecord};
    use crate::navigator::Direction;
    use crate::test_http::{self, StubServer};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves the listed paths and records probe order and overlap.
    #[derive(Default)]
    struct FakeProbe {
        present: HashSet<String>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeProbe {
        fn with_pages(series: &str, chapter: u32, count: u32) -> Self {
            Self {
                present: (1..=count)
                    .map(|n| paths::page_path(series, chapter, n))
                    .collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageProbe for FakeProbe {
        async fn probe(&self, path: &str) -> Result<Vec<u8>, YomikomiError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(path.to_string());
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.present.contains(path) {
                Ok(path.as_bytes().to_vec())
            } else {
                Err(YomikomiError::Status {
                    status: 404,
                    url: path.to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_five_pages_then_end_marker() {
        let store = MemoryStore::new();
        let probe = FakeProbe::with_pages("solo", 2, 5);
        let mut session = ReaderSession::begin("solo", 2, &Progress::new(&store));
        let mut events = Vec::new();

        let state = session.run(&probe, &mut events).await;

        assert_eq!(state, LoaderState::Done { pages: 5 });
        assert_eq!(events.len(), 6);
        let numbers: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                ReaderEvent::Page(p) => Some(p.number),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(events.last(), Some(&ReaderEvent::EndOfChapter));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_http_not_found_ends_chapter() {
        let server = StubServer::start(|_, path| match path {
            "/site/Images/solo/ch2/01.jpg" | "/site/Images/solo/ch2/02.jpg" => {
                (200, path.as_bytes().to_vec())
            }
            _ => (404, b"Not Found".to_vec()),
        })
        .await;
        let site = HttpPageProbe::new(server.base.join("site").unwrap())
            .with_client(test_http::client());
        let store = MemoryStore::new();
        let mut session = ReaderSession::begin("solo", 2, &Progress::new(&store));
        let mut events = Vec::new();

        let state = session.run(&site, &mut events).await;

        assert_eq!(state, LoaderState::Done { pages: 2 });
        assert_eq!(events.len(), 3);
        assert_eq!(events.last(), Some(&ReaderEvent::EndOfChapter));
        assert_eq!(
            server.paths(),
            vec![
                "/site/Images/solo/ch2/01.jpg",
                "/site/Images/solo/ch2/02.jpg",
                "/site/Images/solo/ch2/03.jpg",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_first_page_is_empty() {
        let store = MemoryStore::new();
        let probe = FakeProbe::default();
        let mut session = ReaderSession::begin("solo", 9, &Progress::new(&store));
        let mut events = Vec::new();

        let state = session.run(&probe, &mut events).await;

        assert_eq!(state, LoaderState::Empty);
        assert_eq!(events, vec![ReaderEvent::NoImages]);
        assert_eq!(probe.calls(), vec!["Images/solo/ch9/01.jpg"]);
    }

    #[tokio::test]
    async fn test_probes_are_sequential_and_ordered() {
        let store = MemoryStore::new();
        let probe = FakeProbe::with_pages("solo", 1, 3);
        let mut session = ReaderSession::begin("solo", 1, &Progress::new(&store));
        let mut events = Vec::new();

        session.run(&probe, &mut events).await;

        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(
            probe.calls(),
            vec![
                "Images/solo/ch1/01.jpg",
                "Images/solo/ch1/02.jpg",
                "Images/solo/ch1/03.jpg",
                "Images/solo/ch1/04.jpg",
            ]
        );
    }

    #[test]
    fn test_progress_written_before_probing() {
        let store = MemoryStore::new();
        let progress = Progress::new(&store);
        let session = ReaderSession::begin("solo", 42, &progress);

        assert_eq!(progress.get("solo"), Some(42));
        assert_eq!(session.page_cursor(), Some(1));
        assert_eq!(session.next_path().as_deref(), Some("Images/solo/ch42/01.jpg"));
    }

    #[test]
    fn test_terminal_state_ignores_further_input() {
        let store = MemoryStore::new();
        let mut session = ReaderSession::begin("solo", 1, &Progress::new(&store));

        let miss = || {
            Err(YomikomiError::Status {
                status: 404,
                url: String::new(),
            })
        };
        assert_eq!(session.advance(miss()), Some(ReaderEvent::NoImages));
        assert_eq!(session.advance(Ok(vec![1])), None);
        assert_eq!(session.state(), LoaderState::Empty);
        assert_eq!(session.next_path(), None);
    }

    #[tokio::test]
    async fn test_fs_probe_reads_site_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let chapter_dir = dir.path().join("Images/solo/ch1");
        std::fs::create_dir_all(&chapter_dir).unwrap();
        std::fs::write(chapter_dir.join("01.jpg"), b"one").unwrap();
        std::fs::write(chapter_dir.join("02.jpg"), b"two").unwrap();
        // Unpadded names are not part of the sequence.
        std::fs::write(chapter_dir.join("3.jpg"), b"three").unwrap();

        let store = MemoryStore::new();
        let probe = FsPageProbe::new(dir.path());
        let mut session = ReaderSession::begin("solo", 1, &Progress::new(&store));
        let mut events = Vec::new();

        let state = session.run(&probe, &mut events).await;
        assert_eq!(state, LoaderState::Done { pages: 2 });
        match &events[1] {
            ReaderEvent::Page(p) => assert_eq!(p.bytes, b"two"),
            other => panic!("Expected page, got {other:?}"),
        }
    }

    #[test]
    fn test_open_reader_page() {
        let catalog = CatalogStore::from_records(vec![SeriesRecord::new(
            "solo",
            "Solo Leveling",
            Category::Manhwa,
        )]);
        let store = MemoryStore::new();

        let page = ReaderPage::open(&ReaderQuery::parse("?series=solo&chapter=3"), &catalog, &store)
            .unwrap();
        assert_eq!(page.heading, "Solo Leveling - Ch 3");
        assert_eq!(Progress::new(&store).get("solo"), Some(3));
        assert_eq!(page.navigator.go(Direction::Next).unwrap().chapter, 4);

        let page =
            ReaderPage::open(&ReaderQuery::parse("?series=ghost"), &catalog, &store).unwrap();
        assert_eq!(page.heading, "ghost - Ch 1");
    }

    #[test]
    fn test_open_without_series_fails() {
        let catalog = CatalogStore::default();
        let store = MemoryStore::new();
        let result = ReaderPage::open(&ReaderQuery::parse("?chapter=2"), &catalog, &store);
        assert!(matches!(result, Err(YomikomiError::Validation(_))));
        assert_eq!(Progress::new(&store).get(""), None);
    }
}
