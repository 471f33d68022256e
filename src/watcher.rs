//! Periodic refresh loop
//!
//! Re-fetches the problem snapshot on a fixed interval so the tree follows
//! solving progress without a manual refresh. Failures are logged and the
//! loop carries on with the last published index.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::explorer::{Explorer, ProblemFetcher};

/// Watcher status, serializable for status reporting
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct WatcherStatus {
    pub running: bool,
    pub refreshes: u64,
    pub failures: u64,
    pub last_error: Option<String>,
    pub interval_secs: u64,
}

/// Refresh `explorer` every `interval` until `shutdown` flips to `true`
/// or its sender is dropped.
///
/// The first refresh happens one interval after start. A zero interval
/// means periodic refresh is disabled and the loop returns immediately.
pub async fn refresh_loop<F: ProblemFetcher>(
    explorer: Arc<Explorer<F>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    status: Arc<Mutex<WatcherStatus>>,
) {
    if interval.is_zero() {
        tracing::warn!("Refresh loop not started: interval is zero");
        return;
    }

    tracing::info!("Refresh loop started: interval={}s", interval.as_secs());
    set_status(&status, |s| {
        s.running = true;
        s.interval_secs = interval.as_secs();
    });

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match explorer.refresh().await {
                    Ok(()) => set_status(&status, |s| {
                        s.refreshes += 1;
                        s.last_error = None;
                    }),
                    Err(e) => {
                        tracing::error!("Periodic refresh failed: {}", e);
                        set_status(&status, |s| {
                            s.failures += 1;
                            s.last_error = Some(e.to_string());
                        });
                    }
                }
            }
        }
    }

    set_status(&status, |s| s.running = false);
    tracing::info!("Refresh loop stopped");
}

fn set_status(status: &Mutex<WatcherStatus>, update: impl FnOnce(&mut WatcherStatus)) {
    // A poisoned status only means a reader panicked; keep updating it
    let mut guard = status.lock().unwrap_or_else(|e| e.into_inner());
    update(&mut guard);
}
