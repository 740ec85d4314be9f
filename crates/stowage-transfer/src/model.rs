//! Transfer intents, move outcomes, and the drag-boundary payload.

use serde::Serialize;

/// What is being moved: an ordered, de-duplicated set of file names, or a
/// single folder identified by its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferPayload {
    /// File names relative to the intent's source folder. Never empty.
    Files(Vec<String>),
    /// Full path of the folder being moved.
    Folder(String),
}

impl TransferPayload {
    /// Number of items this payload carries.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            Self::Files(names) => names.len(),
            Self::Folder(_) => 1,
        }
    }
}

/// Full intent of one in-flight move: what moves, from where, to where, and
/// across which source boundary. Owned by exactly one transfer attempt and
/// discarded when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    /// The items being moved.
    pub payload: TransferPayload,
    /// Folder the items currently live in. For a folder payload this is the
    /// moved folder's current parent.
    pub source_folder: String,
    /// Storage source on the originating side; empty means the default source.
    pub source_id: String,
    /// Folder the items should land in.
    pub dest_folder: String,
    /// Storage source on the destination side.
    pub dest_source_id: String,
    /// Total byte size of the selection, when it could be computed.
    pub total_bytes: u64,
    /// Whether `total_bytes` covers every item in the payload.
    pub bytes_known: bool,
}

impl TransferIntent {
    /// Whether both sides of the move are on the same storage source.
    #[must_use]
    pub fn same_source(&self) -> bool {
        self.source_id == self.dest_source_id
    }

    /// Number of items this intent moves.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.payload.item_count()
    }

    /// Short label for progress display: the single item's name, or a count.
    #[must_use]
    pub fn item_label(&self) -> String {
        match &self.payload {
            TransferPayload::Files(names) => match names.as_slice() {
                [single] => single.clone(),
                many => format!("{} items", many.len()),
            },
            TransferPayload::Folder(path) => folder_label(path).to_string(),
        }
    }
}

/// Last path segment of a folder path, used for display.
#[must_use]
pub fn folder_label(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Result of one transfer attempt. Produced exactly once per intent, never
/// partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the move completed on the server.
    pub ok: bool,
    /// User-facing failure message when `ok` is false.
    pub error_message: Option<String>,
}

impl MoveOutcome {
    /// A completed move.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            ok: true,
            error_message: None,
        }
    }

    /// A failed move with the given user-facing message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_message: Some(message.into()),
        }
    }
}

/// The intent serialized for the drag-and-drop boundary, in two parallel
/// representations: a structured JSON form for programmatic consumers and a
/// plain-text form (newline-joined names) for drop targets that cannot read
/// the structured one. Drag transport is lossy across origins and browsers,
/// so both travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    /// JSON encoding of the intent.
    pub structured: String,
    /// Newline-joined item names (or the single folder path).
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntentWire<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
    source_folder: &'a str,
    source_id: &'a str,
    dest_folder: &'a str,
    dest_source_id: &'a str,
    total_bytes: u64,
    bytes_known: bool,
    item_count: usize,
}

impl DragPayload {
    /// Serialize the intent for the drag boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the structured form cannot be encoded as JSON.
    pub fn from_intent(intent: &TransferIntent) -> Result<Self, serde_json::Error> {
        let (kind, items, folder, text) = match &intent.payload {
            TransferPayload::Files(names) => {
                ("files", Some(names.as_slice()), None, names.join("\n"))
            }
            TransferPayload::Folder(path) => ("folder", None, Some(path.as_str()), path.clone()),
        };

        let wire = IntentWire {
            kind,
            items,
            folder,
            source_folder: &intent.source_folder,
            source_id: &intent.source_id,
            dest_folder: &intent.dest_folder,
            dest_source_id: &intent.dest_source_id,
            total_bytes: intent.total_bytes,
            bytes_known: intent.bytes_known,
            item_count: intent.item_count(),
        };

        Ok(Self {
            structured: serde_json::to_string(&wire)?,
            text,
        })
    }
}
