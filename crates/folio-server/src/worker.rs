//! Background session pruning.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use folio_core::session::SessionStore;

/// Periodically drop expired sessions until `shutdown` fires.
pub async fn session_prune_worker(
    sessions: Arc<SessionStore>,
    mut shutdown: watch::Receiver<bool>,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, "session prune worker started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let pruned = sessions.prune_expired().await;
                if pruned > 0 {
                    let remaining = sessions.len().await;
                    info!(pruned, remaining, "expired sessions pruned");
                }
            }
            _ = shutdown.changed() => {
                info!("session prune worker shutting down");
                return;
            }
        }
    }
}
