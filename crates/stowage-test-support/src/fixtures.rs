//! Test fixtures for wiring the subsystem against a mock server.

use stowage_client::{StoreClient, StoreConfig};

/// CSRF token used by every test client; endpoint assertions can match it.
pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";

/// Build a [`StoreClient`] pointed at a mock server's base URL.
///
/// # Panics
///
/// Panics if the URL does not parse or the client cannot be built; both
/// indicate a broken test environment.
#[must_use]
pub fn store_client(base_url: &str) -> StoreClient {
    let url = base_url.parse().expect("valid mock server URL");
    StoreClient::new(StoreConfig::new(url, TEST_CSRF_TOKEN)).expect("client builds")
}
