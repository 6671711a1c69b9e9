//! Periodic cleanup of stale connection registry rows.
//!
//! Spawns a background loop that sweeps the `connections` table: virtual
//! entries are always purged, and entries older than the configured stale
//! cutoff are purged unless their socket is still live. Runs on a fixed
//! interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use ordercast_dispatch::{sweep, ReaperPolicy};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Run the connection reaper loop.
///
/// Each tick snapshots the live socket IDs from `WsManager` and hands them
/// to the sweep so rows with an open socket are never deleted. Runs until
/// `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    config: Arc<ServerConfig>,
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) {
    let policy = ReaperPolicy {
        stale_after: config
            .reaper_stale_after_secs
            .map(|secs| chrono::Duration::seconds(secs as i64)),
    };

    tracing::info!(
        interval_secs = config.reaper_interval_secs,
        stale_after_secs = ?config.reaper_stale_after_secs,
        "Connection reaper started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.reaper_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Connection reaper stopping");
                break;
            }
            _ = interval.tick() => {
                let live = ws_manager.live_connection_ids().await;
                match sweep(&pool, &policy, &live).await {
                    Ok(outcome) => {
                        if outcome.removed > 0 {
                            tracing::info!(removed = outcome.removed, "Reaper: purged stale connections");
                        } else {
                            tracing::debug!("Reaper: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reaper: sweep failed");
                    }
                }
            }
        }
    }
}
