#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Shared HTTP DTOs for the stowage file-store API.
//!
//! These types are the single source of truth for the wire contract between
//! the client subsystem and the remote store. Field names are camelCase on
//! the wire; the serde renames below keep the Rust side idiomatic while the
//! encoded bodies stay byte-compatible with the server.

use serde::{Deserialize, Serialize};

/// Request body for moving a set of files between folders.
///
/// `source_id` / `dest_source_id` identify the storage source on each side of
/// the move; an empty string denotes the default source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveFilesRequest {
    /// Folder the files currently live in.
    pub source: String,
    /// File names relative to `source`.
    pub files: Vec<String>,
    /// Folder the files should land in.
    pub destination: String,
    /// Storage source of the originating folder.
    pub source_id: String,
    /// Storage source of the destination folder.
    pub dest_source_id: String,
}

/// Response body for a file-set move.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveFilesResponse {
    /// Set by the server on success.
    #[serde(default)]
    pub success: bool,
    /// Explicit error message carried in an otherwise-2xx body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for moving a single folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    /// Full path of the folder being moved.
    pub source: String,
    /// Folder the moved folder should land in.
    pub destination: String,
    /// Storage source of the moved folder.
    pub source_id: String,
    /// Storage source of the destination folder.
    pub dest_source_id: String,
}

/// Response body for a folder move. The server may echo the resolved
/// destination parent; an empty object is also a valid success.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderResponse {
    /// Resolved destination parent, when the server echoes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Explicit error message carried in an otherwise-2xx body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry in the trash listing. Created server-side on delete and
/// read-only to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    /// Opaque storage key used for restore/delete calls.
    pub trash_name: String,
    /// Display name the item had before deletion.
    pub original_name: String,
    /// Label of the user that deleted the item.
    pub deleted_by: String,
    /// Deletion time as unix seconds.
    pub trashed_at: i64,
}

/// Request body for restoring trash entries by their storage keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestoreTrashRequest {
    /// Trash keys to restore.
    pub files: Vec<String>,
}

/// Request body for permanently deleting trash entries. Exactly one of the
/// two fields is populated: a named set of keys, or the delete-all flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTrashRequest {
    /// Trash keys to delete, when deleting a named set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Set to `true` to empty the trash in one call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_all: Option<bool>,
}

impl DeleteTrashRequest {
    /// Delete the given trash keys.
    #[must_use]
    pub fn named(files: Vec<String>) -> Self {
        Self {
            files: Some(files),
            delete_all: None,
        }
    }

    /// Delete every entry in the trash.
    #[must_use]
    pub fn all() -> Self {
        Self {
            files: None,
            delete_all: Some(true),
        }
    }
}

/// Response body for a trash delete.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DeleteTrashResponse {
    /// Server-provided confirmation message on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    /// Server-provided error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Minimal envelope used to probe arbitrary response bodies for an explicit
/// error field during classification.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorEnvelope {
    /// Explicit error message, when the body carries one.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn move_files_request_uses_wire_field_names() {
        let request = MoveFilesRequest {
            source: "root/docs".to_string(),
            files: vec!["report.pdf".to_string()],
            destination: "root/archive".to_string(),
            source_id: String::new(),
            dest_source_id: String::new(),
        };

        let encoded = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            encoded,
            json!({
                "source": "root/docs",
                "files": ["report.pdf"],
                "destination": "root/archive",
                "sourceId": "",
                "destSourceId": "",
            })
        );
    }

    #[test]
    fn delete_all_request_carries_only_the_flag() {
        let encoded =
            serde_json::to_value(DeleteTrashRequest::all()).expect("serialize delete-all");
        assert_eq!(encoded, json!({ "deleteAll": true }));
    }

    #[test]
    fn named_delete_request_carries_only_the_keys() {
        let encoded = serde_json::to_value(DeleteTrashRequest::named(vec!["a".to_string()]))
            .expect("serialize named delete");
        assert_eq!(encoded, json!({ "files": ["a"] }));
    }

    #[test]
    fn trash_entry_decodes_wire_fields() {
        let entry: TrashEntry = serde_json::from_value(json!({
            "trashName": "1a2b3c",
            "originalName": "notes.txt",
            "deletedBy": "alice",
            "trashedAt": 1_700_000_000,
        }))
        .expect("decode trash entry");

        assert_eq!(entry.trash_name, "1a2b3c");
        assert_eq!(entry.original_name, "notes.txt");
        assert_eq!(entry.deleted_by, "alice");
        assert_eq!(entry.trashed_at, 1_700_000_000);
    }

    #[test]
    fn folder_move_response_tolerates_empty_object() {
        let decoded: MoveFolderResponse =
            serde_json::from_value(json!({})).expect("decode empty body");
        assert_eq!(decoded, MoveFolderResponse::default());
    }
}
