//! Local move validation: rules that must reject an illegal move before any
//! network round-trip.
//!
//! Path-identity rules only apply to same-source moves; two storage sources
//! have disjoint namespaces, so a folder on source A can legally move into a
//! folder of the same name on source B.

use crate::error::TransferError;
use crate::model::{TransferIntent, TransferPayload};

/// Rejection message for a move whose destination is where the items already
/// live.
pub const MSG_SAME_FOLDER: &str = "source and destination are the same";

/// Rejection message for a folder moved into itself or one of its
/// descendants.
pub const MSG_DESCENDANT: &str = "Destination cannot be the source or its descendant";

/// Validate a move intent locally. Returns `Ok(())` for every cross-source
/// move; same-source moves are checked in order: no-op first, then the
/// self/descendant guard for folders.
///
/// # Errors
///
/// Returns [`TransferError::Rejected`] when the move must not reach the
/// network. A rejection is terminal for the attempt.
pub fn validate_move(intent: &TransferIntent) -> Result<(), TransferError> {
    if !intent.same_source() {
        return Ok(());
    }

    // No-op: dropping onto the folder the items already live in (for a
    // folder payload, `source_folder` is its current parent).
    if intent.dest_folder == intent.source_folder {
        return Err(TransferError::rejected(MSG_SAME_FOLDER));
    }

    if let TransferPayload::Folder(path) = &intent.payload {
        let source = normalize_path(path);
        let destination = normalize_path(&intent.dest_folder);
        if destination == source || destination.starts_with(&format!("{source}/")) {
            return Err(TransferError::rejected(MSG_DESCENDANT));
        }
    }

    Ok(())
}

/// Normalise a path for identity comparison: trim slashes at both ends and
/// case-fold, matching the server's path handling.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_lowercase()
}

/// Parent folder of a path, or the empty string for a top-level entry.
#[must_use]
pub fn parent_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Per-folder action gates supplied by the host. Read-only input for the
/// UI-enabling logic; network validation stays server-authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderCapabilities {
    /// Whether items in this folder may be moved.
    pub can_move: bool,
    /// Whether items in this folder may be shared.
    pub can_share: bool,
    /// Whether archives in this folder may be extracted.
    pub can_extract: bool,
}

/// Actions the UI may offer on a folder's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderAction {
    /// Drag/drop and move-to-folder actions.
    Move,
    /// Share-link actions.
    Share,
    /// Archive extraction.
    Extract,
}

/// The subset of actions the capabilities allow, in stable order.
#[must_use]
pub fn offered_actions(capabilities: &FolderCapabilities) -> Vec<FolderAction> {
    let mut actions = Vec::new();
    if capabilities.can_move {
        actions.push(FolderAction::Move);
    }
    if capabilities.can_share {
        actions.push(FolderAction::Share);
    }
    if capabilities.can_extract {
        actions.push(FolderAction::Extract);
    }
    actions
}
