//! Registry sweep: removes virtual entries and, when policy allows, stale
//! entries with no live transport session.

use std::collections::HashSet;

use ordercast_db::repositories::ConnectionRepo;
use ordercast_db::DbPool;

/// What a sweep is allowed to remove beyond virtual entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReaperPolicy {
    /// When set, non-virtual entries connected earlier than now minus this
    /// duration are removed unless the caller reports a live session for
    /// them. `None` limits the sweep to virtual entries.
    pub stale_after: Option<chrono::Duration>,
}

/// Result of one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub removed: u64,
}

/// Scan the registry and delete virtual and stale entries.
///
/// Safe to run concurrently with registrations: removal re-checks each
/// entry's composite identity at delete time
/// ([`ConnectionRepo::delete_if_match`]), and entries registered after the
/// scan began are absent from the scanned snapshot, so they survive.
/// `live_connection_ids` is the set of handles with an open socket right
/// now; stale-by-age entries in that set are skipped.
pub async fn sweep(
    pool: &DbPool,
    policy: &ReaperPolicy,
    live_connection_ids: &HashSet<String>,
) -> Result<SweepOutcome, sqlx::Error> {
    let mut outcome = SweepOutcome::default();

    for conn in ConnectionRepo::list_virtual(pool).await? {
        let deleted = ConnectionRepo::delete_if_match(
            pool,
            &conn.connection_id,
            &conn.business_id,
            &conn.user_id,
        )
        .await?;
        if deleted {
            tracing::debug!(
                connection_id = %conn.connection_id,
                business_id = %conn.business_id,
                "Reaped virtual connection"
            );
            outcome.removed += 1;
        }
    }

    if let Some(stale_after) = policy.stale_after {
        let cutoff = chrono::Utc::now() - stale_after;
        for conn in ConnectionRepo::list_older_than(pool, cutoff).await? {
            if live_connection_ids.contains(&conn.connection_id) {
                continue;
            }
            let deleted = ConnectionRepo::delete_if_match(
                pool,
                &conn.connection_id,
                &conn.business_id,
                &conn.user_id,
            )
            .await?;
            if deleted {
                tracing::debug!(
                    connection_id = %conn.connection_id,
                    business_id = %conn.business_id,
                    connected_at = %conn.connected_at,
                    "Reaped stale connection"
                );
                outcome.removed += 1;
            }
        }
    }

    Ok(outcome)
}
