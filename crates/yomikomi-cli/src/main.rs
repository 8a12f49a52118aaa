mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;
use yomikomi_core::catalog::{CatalogStore, FileCatalogSource, HttpCatalogSource};
use yomikomi_core::config::AppConfig;
use yomikomi_core::error::YomikomiError;
use yomikomi_core::favorites::Favorites;
use yomikomi_core::filter::CategoryFilter;
use yomikomi_core::hero::hero_banner;
use yomikomi_core::home::HomePage;
use yomikomi_core::navigator::{Direction, ReaderQuery};
use yomikomi_core::reader::{FsPageProbe, HttpPageProbe, LoaderState, ReaderPage};
use yomikomi_core::session::Session;
use yomikomi_core::storage::SqliteStore;
use yomikomi_core::upload::{self, HttpUploader, SeriesSelector, UploadFile, UploadForm};

use crate::output::PagePrinter;

#[derive(Parser)]
#[command(name = "yomikomi", version, about = "Browse and read the manga catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List series, optionally filtered.
    List {
        /// all, favorites, manga, manhwa, ...
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Read a chapter. Accepts a reader URL, a query string, or a series id.
    Read {
        target: String,
        #[arg(short, long)]
        chapter: Option<u32>,
        /// Save pages into this directory as they load.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Toggle a series in the favorites list.
    Favorite { series: String },
    Login { username: String },
    Logout,
    /// Upload a chapter's page images.
    Upload {
        /// Existing series id; omit to create `--new-series`.
        #[arg(long)]
        series: Option<String>,
        #[arg(long)]
        new_series: Option<String>,
        #[arg(long)]
        chapter: String,
        images: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yomikomi_core=warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), YomikomiError> {
    let config = AppConfig::load()?;
    let store = SqliteStore::open(&AppConfig::ensure_db_path()?)?;
    let base = config.base_url()?;

    match cli.command {
        Command::List { category, search } => {
            let catalog = load_catalog(&config, base.as_ref()).await?;
            if let Some(banner) = hero_banner(catalog.records()) {
                output::print_banner(&banner);
            }
            let mut page = HomePage::new(&catalog, &store, config.site.placeholder_cover.as_str());
            page.render(category, search);
            output::print_cards(page.cards());
        }
        Command::Read {
            target,
            chapter,
            out,
        } => {
            let mut query = if target.contains('=') {
                ReaderQuery::parse(&target)
            } else {
                ReaderQuery {
                    series: Some(target),
                    chapter: 1,
                }
            };
            if let Some(chapter) = chapter.filter(|c| *c >= 1) {
                query.chapter = chapter;
            }

            let catalog = load_catalog(&config, base.as_ref()).await?;
            let mut reader = ReaderPage::open(&query, &catalog, &store)?;
            println!("{}", reader.heading);

            if let Some(dir) = &out {
                std::fs::create_dir_all(dir)?;
            }
            let mut printer = PagePrinter::new(out);
            let state = match &base {
                Some(base) => {
                    let probe = HttpPageProbe::new(base.clone());
                    reader.session.run(&probe, &mut printer).await
                }
                None => {
                    let probe = FsPageProbe::new(&config.site.root);
                    reader.session.run(&probe, &mut printer).await
                }
            };
            if let LoaderState::Done { pages } = state {
                tracing::debug!(pages, "Chapter finished");
            }
            for direction in [Direction::Previous, Direction::Next] {
                if let Some(nav) = reader.navigator.go(direction) {
                    println!("{direction:?}: {}", nav.url);
                }
            }
        }
        Command::Favorite { series } => {
            let on = Favorites::new(&store).toggle(&series);
            println!(
                "{} {series}",
                if on { "Added to favorites:" } else { "Removed from favorites:" }
            );
        }
        Command::Login { username } => {
            let mut session = Session::restore(&store);
            session.login(&store, username.trim());
            println!("{}", session.greeting());
            if session.can_upload(&config.accounts.authorized_uploaders) {
                println!("Uploads enabled.");
            }
        }
        Command::Logout => {
            Session::restore(&store).logout(&store);
            println!("Logged out.");
        }
        Command::Upload {
            series,
            new_series,
            chapter,
            images,
        } => {
            let session = Session::restore(&store);
            if !session.can_upload(&config.accounts.authorized_uploaders) {
                return Err(YomikomiError::Validation(
                    "Log in as an authorized uploader first.".into(),
                ));
            }
            let base = base.ok_or_else(|| {
                YomikomiError::Config("site.base_url is required for uploads".into())
            })?;

            let catalog = load_catalog(&config, Some(&base)).await?;
            let mut selector = SeriesSelector::default();
            selector.populate(catalog.records());
            if let Some(id) = &series {
                selector.select(id);
            }

            let mut files = Vec::with_capacity(images.len());
            for path in &images {
                files.push(UploadFile {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    bytes: tokio::fs::read(path).await?,
                });
            }

            let form = UploadForm {
                selection: selector.selected().to_string(),
                new_series_name: new_series.unwrap_or_default(),
                chapter,
                images: files,
            };
            let uploader = HttpUploader::new(&base)?;
            let status = upload::submit(&uploader, form, |s| println!("{}", s.message())).await;
            if !status.should_reload() {
                return Err(YomikomiError::Validation(status.message()));
            }
        }
    }
    Ok(())
}

async fn load_catalog(
    config: &AppConfig,
    base: Option<&Url>,
) -> Result<CatalogStore, YomikomiError> {
    Ok(match base {
        Some(base) => {
            let source = HttpCatalogSource::new(base, &config.site.catalog_file)?;
            CatalogStore::load(&source).await
        }
        None => CatalogStore::load(&FileCatalogSource::new(config.catalog_path())).await,
    })
}
