use std::sync::Arc;

use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;

use stowage_events::EventBus;
use stowage_test_support::fixtures::store_client;
use stowage_test_support::mocks::ScriptedConfirm;
use stowage_trash::{ConfirmationProvider, TrashManager, run_auto_purge_at};

const NOW_MS: i64 = 1_700_000_000_000;
const NOW_SECS: i64 = NOW_MS / 1000;

fn manager(server: &MockServer) -> TrashManager {
    TrashManager::new(
        store_client(&server.base_url()),
        EventBus::new(),
        Arc::new(ScriptedConfirm::new(true)) as Arc<dyn ConfirmationProvider>,
    )
}

#[tokio::test]
async fn purge_batches_only_expired_keys_into_one_delete() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/trash");
        then.status(200).json_body(json!([
            {
                "trashName": "old-1",
                "originalName": "a.txt",
                "deletedBy": "alice",
                "trashedAt": NOW_SECS - 4 * 86_400,
            },
            {
                "trashName": "old-2",
                "originalName": "b.txt",
                "deletedBy": "alice",
                "trashedAt": NOW_SECS - 5 * 86_400,
            },
            {
                "trashName": "fresh",
                "originalName": "c.txt",
                "deletedBy": "bob",
                "trashedAt": NOW_SECS - 86_400,
            },
        ]));
    });
    let delete = server.mock(|when, then| {
        when.method(POST)
            .path("/api/trash/delete")
            .json_body(json!({ "files": ["old-1", "old-2"] }));
        then.status(200).json_body(json!({ "success": "Deleted." }));
    });

    let manager = manager(&server);
    run_auto_purge_at(&manager, NOW_MS).await;
    delete.assert();
}

#[tokio::test]
async fn purge_with_nothing_expired_deletes_nothing() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/trash");
        then.status(200).json_body(json!([{
            "trashName": "fresh",
            "originalName": "c.txt",
            "deletedBy": "bob",
            "trashedAt": NOW_SECS,
        }]));
    });
    let delete = server.mock(|when, then| {
        when.method(POST).path("/api/trash/delete");
        then.status(200);
    });

    let manager = manager(&server);
    run_auto_purge_at(&manager, NOW_MS).await;
    delete.assert_hits(0);
}

#[tokio::test]
async fn listing_failure_is_soft() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/trash");
        then.status(500);
    });
    let delete = server.mock(|when, then| {
        when.method(POST).path("/api/trash/delete");
        then.status(200);
    });

    let manager = manager(&server);
    run_auto_purge_at(&manager, NOW_MS).await;
    delete.assert_hits(0);
}

#[tokio::test]
async fn delete_failure_is_soft() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/trash");
        then.status(200).json_body(json!([{
            "trashName": "old",
            "originalName": "a.txt",
            "deletedBy": "alice",
            "trashedAt": NOW_SECS - 4 * 86_400,
        }]));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/trash/delete");
        then.status(500).json_body(json!({ "error": "locked" }));
    });

    let manager = manager(&server);
    // Must not panic or surface anything; failure is logged only.
    run_auto_purge_at(&manager, NOW_MS).await;
}
