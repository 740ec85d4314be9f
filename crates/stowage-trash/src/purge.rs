//! Time-based auto-purge: permanently drop trash entries older than the
//! retention window.
//!
//! Runs once at subsystem initialisation, not on a timer. Failure is soft:
//! logged, never surfaced to the user, never retried within the session.

use chrono::Utc;
use tracing::{debug, warn};

use stowage_api_models::TrashEntry;

use crate::manager::TrashManager;

/// Retention window in milliseconds (3 days). Entries strictly older than
/// this are purged; entries exactly at the threshold are retained.
pub const PURGE_AGE_MS: i64 = 259_200_000;

/// Whether an entry has outlived the retention window at `now_ms`.
#[must_use]
pub fn is_expired(entry: &TrashEntry, now_ms: i64) -> bool {
    now_ms - entry.trashed_at * 1000 > PURGE_AGE_MS
}

/// Run the purge sweep against the current wall clock.
pub async fn run_auto_purge(manager: &TrashManager) {
    run_auto_purge_at(manager, Utc::now().timestamp_millis()).await;
}

/// Run the purge sweep as of `now_ms`: fetch the listing (sharing any
/// in-flight fetch), batch every expired key into one delete call, and
/// refresh the listing on success so an open panel reflects the purge.
pub async fn run_auto_purge_at(manager: &TrashManager, now_ms: i64) {
    let entries = match manager.list().await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "auto-purge could not list trash");
            return;
        }
    };

    let expired: Vec<String> = entries
        .iter()
        .filter(|entry| is_expired(entry, now_ms))
        .map(|entry| entry.trash_name.clone())
        .collect();
    if expired.is_empty() {
        debug!("auto-purge found nothing to delete");
        return;
    }

    let count = expired.len();
    if let Err(err) = manager.delete_for_purge(expired).await {
        warn!(error = %err, count, "auto-purge delete failed");
    } else {
        debug!(count, "auto-purge deleted expired trash entries");
    }
}
