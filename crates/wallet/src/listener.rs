use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::WalletError;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Spawns a background task that watches `dir` for filesystem events and
/// invokes `on_new_file` with each event's path once the file is
/// confirmed to still exist (late-arriving files are handed off
/// one-at-a-time, without a full directory rescan).
///
/// The task stops as soon as `cancellation` is cancelled, and signals
/// completion through the returned receiver.
pub fn spawn(
    dir: PathBuf,
    cancellation: CancellationToken,
    on_new_file: impl Fn(&Path) + Send + 'static,
) -> Result<oneshot::Receiver<()>, WalletError> {
    let (done_tx, done_rx) = oneshot::channel();
    let (event_tx, event_rx) = std_mpsc::channel();

    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .map_err(|e| WalletError::Io(e.to_string()))?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| WalletError::Io(e.to_string()))?;

    tokio::task::spawn_blocking(move || {
        // Keep the watcher alive for the duration of the loop.
        let _watcher = watcher;
        loop {
            if cancellation.is_cancelled() {
                break;
            }
            match event_rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    for path in event.paths {
                        if path.is_file() {
                            on_new_file(&path);
                        }
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "filesystem watch error");
                }
                Err(std_mpsc::RecvTimeoutError::Timeout) => continue,
                Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        let _ = done_tx.send(());
    });

    Ok(done_rx)
}
