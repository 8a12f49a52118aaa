use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use yomikomi_core::config::AppConfig;
use yomikomi_sync::error::SyncError;
use yomikomi_sync::reconcile::Reconciler;
use yomikomi_sync::watch::watch;

/// Sync the catalog JSON with the chapters found under the image tree.
#[derive(Parser)]
#[command(name = "yomikomi-sync", version)]
struct Cli {
    /// Keep running and re-sync whenever the image tree changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yomikomi_sync=info,yomikomi_core=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Sync failed");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), SyncError> {
    let config = AppConfig::load()?;
    let reconciler = Reconciler::from_config(&config);

    let first = reconciler.clone();
    tokio::task::spawn_blocking(move || first.run_pass())
        .await
        .map_err(|e| SyncError::Io(std::io::Error::other(e)))??;

    if cli.watch {
        watch(reconciler, Duration::from_millis(config.sync.debounce_ms)).await?;
    }
    Ok(())
}
