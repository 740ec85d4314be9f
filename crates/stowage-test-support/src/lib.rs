#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Shared test helpers used across the workspace's suites.
//! Layout: `fixtures.rs` (client builders), `mocks.rs` (scripted doubles for
//! the subsystem's injection points).

pub mod fixtures;
pub mod mocks;
