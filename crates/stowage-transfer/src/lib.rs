#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Transfer orchestration: turning a drag gesture into a validated,
//! single-shot, cache-coherent move against the remote file store.
//!
//! Layout: `model.rs` (transfer intents and outcomes), `encoder.rs` (drag
//! payload construction), `validate.rs` (local pre-network rules),
//! `progress.rs` (progress-handle lifecycle), `invalidate.rs` (cache
//! invalidation signals), `executor.rs` (`TransferService`).

pub mod encoder;
pub mod error;
pub mod executor;
pub mod invalidate;
pub mod model;
pub mod progress;
pub mod validate;

pub use encoder::{
    DropTarget, PaneContext, PaneFile, SelectionProvider, encode_file_selection,
    encode_folder_selection,
};
pub use error::TransferError;
pub use executor::TransferService;
pub use invalidate::invalidate_folders;
pub use model::{DragPayload, MoveOutcome, TransferIntent, TransferPayload};
pub use progress::{
    HandleState, ProgressGuard, ProgressHandle, ProgressParams, ProgressReporter, ProgressSink,
    TracingProgressSink,
};
pub use validate::{
    FolderAction, FolderCapabilities, MSG_DESCENDANT, MSG_SAME_FOLDER, offered_actions,
    validate_move,
};
