//! Drag-payload construction: capture the active selection and resolve it
//! into a [`TransferIntent`].
//!
//! The selection is read through a provider trait so the encoder stays
//! decoupled from any particular UI toolkit; the provider also carries the
//! originating pane's state, since multiple panes may be open on different
//! folders or sources.

use std::collections::HashSet;

use crate::error::TransferError;
use crate::model::{TransferIntent, TransferPayload};
use crate::validate::parent_of;

/// Rejection message for selections that resolve to nothing.
pub const MSG_EMPTY_SELECTION: &str = "Nothing selected to move.";

/// Rejection message for selections containing an unnamed item.
pub const MSG_UNNAMED_ITEM: &str = "Selection contains an unnamed item.";

/// File metadata known to the originating pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneFile {
    /// Display name of the file.
    pub name: String,
    /// Byte size, when the pane knows it.
    pub size: Option<u64>,
}

/// State of the pane a drag originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneContext {
    /// Folder the pane is displaying.
    pub folder: String,
    /// Storage source of the displayed folder; empty means the default.
    pub source_id: String,
    /// Metadata for the files the pane currently lists.
    pub files: Vec<PaneFile>,
}

/// Where a drop landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Destination folder path.
    pub folder: String,
    /// Storage source of the destination folder.
    pub source_id: String,
}

/// Capability interface for reading the user's selection, implemented by the
/// host UI.
pub trait SelectionProvider {
    /// Names currently selected in the originating pane, in selection order.
    fn selected_items(&self) -> Vec<String>;

    /// State of the originating pane.
    fn pane(&self) -> PaneContext;
}

/// Build a file-set transfer intent from the active selection, or from the
/// single item under the pointer when the selection is empty.
///
/// Duplicate names collapse to a set, preserving first-seen order. Byte
/// totals come from the pane's metadata; if any selected name cannot be
/// matched, the whole total is marked unknown.
///
/// # Errors
///
/// Returns [`TransferError::Rejected`] when the resolved selection is empty
/// or contains an unnamed item.
pub fn encode_file_selection(
    provider: &dyn SelectionProvider,
    fallback_item: Option<&str>,
    target: &DropTarget,
) -> Result<TransferIntent, TransferError> {
    let pane = provider.pane();
    let mut names = provider.selected_items();
    if names.is_empty()
        && let Some(single) = fallback_item
    {
        names.push(single.to_string());
    }
    let names = dedup_names(names)?;
    let (total_bytes, bytes_known) = byte_total(&pane.files, &names);

    Ok(TransferIntent {
        payload: TransferPayload::Files(names),
        source_folder: pane.folder,
        source_id: pane.source_id,
        dest_folder: target.folder.clone(),
        dest_source_id: target.source_id.clone(),
        total_bytes,
        bytes_known,
    })
}

/// Build a single-folder transfer intent. Folder byte sizes are not
/// pre-computed, so the total is always unknown (the progress handle renders
/// indeterminate).
///
/// # Errors
///
/// Returns [`TransferError::Rejected`] when the folder path is empty.
pub fn encode_folder_selection(
    folder_path: &str,
    source_id: &str,
    target: &DropTarget,
) -> Result<TransferIntent, TransferError> {
    if folder_path.trim_matches('/').is_empty() {
        return Err(TransferError::rejected(MSG_EMPTY_SELECTION));
    }

    Ok(TransferIntent {
        payload: TransferPayload::Folder(folder_path.to_string()),
        source_folder: parent_of(folder_path).to_string(),
        source_id: source_id.to_string(),
        dest_folder: target.folder.clone(),
        dest_source_id: target.source_id.clone(),
        total_bytes: 0,
        bytes_known: false,
    })
}

fn dedup_names(names: Vec<String>) -> Result<Vec<String>, TransferError> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(TransferError::rejected(MSG_UNNAMED_ITEM));
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        if seen.insert(name.clone()) {
            unique.push(name);
        }
    }

    if unique.is_empty() {
        return Err(TransferError::rejected(MSG_EMPTY_SELECTION));
    }
    Ok(unique)
}

/// Sum the byte sizes of the selected names against the pane's metadata.
/// Returns the partial sum and whether every item was matched with a known
/// size.
fn byte_total(files: &[PaneFile], names: &[String]) -> (u64, bool) {
    let mut total: u64 = 0;
    let mut known = true;
    for name in names {
        match lookup_size(files, name) {
            Some(size) => total = total.saturating_add(size),
            None => known = false,
        }
    }
    (total, known)
}

/// Match a selected name against pane metadata, tolerating upstream encoding
/// mismatches by also comparing the HTML-escaped form.
// TODO: drop the escaped-name comparison once pane metadata is guaranteed to
// carry raw names.
fn lookup_size(files: &[PaneFile], name: &str) -> Option<u64> {
    let escaped = html_escape(name);
    files
        .iter()
        .find(|file| file.name == name || file.name == escaped)
        .and_then(|file| file.size)
}

fn html_escape(name: &str) -> String {
    name.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSelection {
        selected: Vec<String>,
        pane: PaneContext,
    }

    impl SelectionProvider for FixedSelection {
        fn selected_items(&self) -> Vec<String> {
            self.selected.clone()
        }

        fn pane(&self) -> PaneContext {
            self.pane.clone()
        }
    }

    fn pane_with(files: Vec<PaneFile>) -> PaneContext {
        PaneContext {
            folder: "root/docs".to_string(),
            source_id: String::new(),
            files,
        }
    }

    fn target() -> DropTarget {
        DropTarget {
            folder: "root/archive".to_string(),
            source_id: String::new(),
        }
    }

    fn file(name: &str, size: u64) -> PaneFile {
        PaneFile {
            name: name.to_string(),
            size: Some(size),
        }
    }

    #[test]
    fn duplicates_collapse_preserving_first_seen_order() {
        let provider = FixedSelection {
            selected: vec![
                "b.txt".to_string(),
                "a.txt".to_string(),
                "b.txt".to_string(),
            ],
            pane: pane_with(vec![file("a.txt", 10), file("b.txt", 20)]),
        };

        let intent = encode_file_selection(&provider, None, &target()).expect("encoded");
        assert_eq!(
            intent.payload,
            TransferPayload::Files(vec!["b.txt".to_string(), "a.txt".to_string()])
        );
        assert_eq!(intent.total_bytes, 30);
        assert!(intent.bytes_known);
        assert_eq!(intent.source_folder, "root/docs");
    }

    #[test]
    fn empty_selection_falls_back_to_pointer_item() {
        let provider = FixedSelection {
            selected: Vec::new(),
            pane: pane_with(vec![file("under-pointer.txt", 7)]),
        };

        let intent = encode_file_selection(&provider, Some("under-pointer.txt"), &target())
            .expect("encoded");
        assert_eq!(
            intent.payload,
            TransferPayload::Files(vec!["under-pointer.txt".to_string()])
        );
        assert_eq!(intent.total_bytes, 7);
        assert!(intent.bytes_known);
    }

    #[test]
    fn empty_selection_without_fallback_is_rejected() {
        let provider = FixedSelection {
            selected: Vec::new(),
            pane: pane_with(Vec::new()),
        };

        let err = encode_file_selection(&provider, None, &target()).expect_err("rejected");
        assert_eq!(err, TransferError::rejected(MSG_EMPTY_SELECTION));
    }

    #[test]
    fn blank_names_are_rejected() {
        let provider = FixedSelection {
            selected: vec!["a.txt".to_string(), "  ".to_string()],
            pane: pane_with(Vec::new()),
        };

        let err = encode_file_selection(&provider, None, &target()).expect_err("rejected");
        assert_eq!(err, TransferError::rejected(MSG_UNNAMED_ITEM));
    }

    #[test]
    fn unmatched_item_makes_the_whole_total_unknown() {
        let provider = FixedSelection {
            selected: vec!["a.txt".to_string(), "missing.txt".to_string()],
            pane: pane_with(vec![file("a.txt", 10)]),
        };

        let intent = encode_file_selection(&provider, None, &target()).expect("encoded");
        assert!(!intent.bytes_known);
    }

    #[test]
    fn matched_item_with_unknown_size_makes_the_total_unknown() {
        let provider = FixedSelection {
            selected: vec!["a.txt".to_string()],
            pane: pane_with(vec![PaneFile {
                name: "a.txt".to_string(),
                size: None,
            }]),
        };

        let intent = encode_file_selection(&provider, None, &target()).expect("encoded");
        assert!(!intent.bytes_known);
    }

    #[test]
    fn escaped_metadata_names_still_match() {
        let provider = FixedSelection {
            selected: vec!["Tom & Jerry.mkv".to_string()],
            pane: pane_with(vec![file("Tom &amp; Jerry.mkv", 99)]),
        };

        let intent = encode_file_selection(&provider, None, &target()).expect("encoded");
        assert_eq!(intent.total_bytes, 99);
        assert!(intent.bytes_known);
    }

    #[test]
    fn folder_selection_resolves_parent_and_unknown_bytes() {
        let intent =
            encode_folder_selection("root/docs/sub", "alt", &target()).expect("encoded");
        assert_eq!(
            intent.payload,
            TransferPayload::Folder("root/docs/sub".to_string())
        );
        assert_eq!(intent.source_folder, "root/docs");
        assert_eq!(intent.source_id, "alt");
        assert!(!intent.bytes_known);
    }

    #[test]
    fn empty_folder_path_is_rejected() {
        let err = encode_folder_selection("/", "", &target()).expect_err("rejected");
        assert_eq!(err, TransferError::rejected(MSG_EMPTY_SELECTION));
    }
}
