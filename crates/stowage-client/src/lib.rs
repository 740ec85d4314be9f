#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! HTTP transport for the stowage file-store API.
//!
//! Layout: `error.rs` (classified client errors), `store.rs` (`StoreClient`
//! and per-endpoint calls). Every mutating request forwards the host-supplied
//! CSRF token as an opaque header; responses are classified uniformly so
//! callers only ever see a single error shape.

pub mod error;
pub mod store;

pub use error::{ClientError, ClientResult};
pub use store::{HEADER_CSRF_TOKEN, StoreClient, StoreConfig};
