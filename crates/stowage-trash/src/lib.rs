#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Trash lifecycle: listing, restore, permanent delete, and time-based
//! auto-purge.
//!
//! Layout: `error.rs` (trash errors), `manager.rs` (`TrashManager` with
//! single-flight listing and the per-action busy gate), `purge.rs`
//! (age-threshold auto-purge policy).

pub mod error;
pub mod manager;
pub mod purge;

pub use error::TrashError;
pub use manager::{
    ConfirmationProvider, DeleteStatus, TrashAction, TrashManager, TrashSelection,
};
pub use purge::{PURGE_AGE_MS, is_expired, run_auto_purge, run_auto_purge_at};
pub use stowage_api_models::TrashEntry;
