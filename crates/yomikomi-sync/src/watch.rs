//! Watch mode: re-run the pass whenever the image tree changes.
//!
//! Filesystem events are forwarded from the notifier thread into a channel.
//! Bursts are coalesced by a trailing debounce and passes run one after
//! another on the same task, so two passes never race on the catalog file.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::SyncError;
use crate::reconcile::Reconciler;

/// Watch the reconciler's image root until Ctrl-C.
pub async fn watch(reconciler: Reconciler, debounce: Duration) -> Result<(), SyncError> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if !event.paths.is_empty() => {
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Watch error"),
    })?;
    watcher.watch(reconciler.images_root(), RecursiveMode::Recursive)?;

    tracing::info!(
        path = %reconciler.images_root().display(),
        debounce_ms = debounce.as_millis() as u64,
        "Watching for changes"
    );

    let reconciler = Arc::new(reconciler);
    let passes = run_debounced(rx, debounce, || {
        let reconciler = Arc::clone(&reconciler);
        async move {
            match tokio::task::spawn_blocking(move || reconciler.run_pass()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Sync pass failed"),
                Err(e) => tracing::error!(error = %e, "Sync pass panicked"),
            }
        }
    });

    tokio::select! {
        _ = passes => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            tracing::info!("Stopping watch");
        }
    }

    drop(watcher);
    Ok(())
}

/// Call `pass` once per burst of triggers, `window` after the last trigger
/// of the burst. Triggers arriving while a pass runs start the next burst.
///
/// Returns when the channel closes, after flushing a pending burst.
pub async fn run_debounced<F, Fut>(
    mut rx: mpsc::UnboundedReceiver<()>,
    window: Duration,
    mut pass: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    while rx.recv().await.is_some() {
        let closed = loop {
            match tokio::time::timeout(window, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => break true,
                Err(_) => break false,
            }
        };

        tracing::debug!("Changes settled, running sync pass");
        pass().await;

        if closed {
            return;
        }
    }
}
