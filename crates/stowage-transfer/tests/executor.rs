use std::sync::Arc;

use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;

use stowage_events::{Event, EventBus, ViewContext};
use stowage_test_support::fixtures::store_client;
use stowage_test_support::mocks::RecordingProgressSink;
use stowage_transfer::progress::{ProgressReporter, ProgressSink};
use stowage_transfer::{TransferIntent, TransferPayload, TransferService};

struct Harness {
    service: TransferService,
    events: EventBus,
    sink: Arc<RecordingProgressSink>,
}

fn harness(server: &MockServer) -> Harness {
    let events = EventBus::new();
    let sink = Arc::new(RecordingProgressSink::default());
    let progress = ProgressReporter::new(Arc::clone(&sink) as Arc<dyn ProgressSink>);
    let service = TransferService::new(store_client(&server.base_url()), events.clone(), progress);
    Harness {
        service,
        events,
        sink,
    }
}

fn view() -> ViewContext {
    ViewContext::new("root/docs", "")
}

fn file_intent() -> TransferIntent {
    TransferIntent {
        payload: TransferPayload::Files(vec!["report.pdf".to_string()]),
        source_folder: "root/docs".to_string(),
        source_id: String::new(),
        dest_folder: "root/archive".to_string(),
        dest_source_id: String::new(),
        total_bytes: 1024,
        bytes_known: true,
    }
}

fn folder_intent(path: &str, dest: &str, source_id: &str, dest_source_id: &str) -> TransferIntent {
    TransferIntent {
        payload: TransferPayload::Folder(path.to_string()),
        source_folder: stowage_transfer::validate::parent_of(path).to_string(),
        source_id: source_id.to_string(),
        dest_folder: dest.to_string(),
        dest_source_id: dest_source_id.to_string(),
        total_bytes: 0,
        bytes_known: false,
    }
}

fn event_kinds(events: &EventBus) -> Vec<&'static str> {
    events
        .recent()
        .into_iter()
        .map(|envelope| envelope.event.kind())
        .collect()
}

fn notices(events: &EventBus) -> Vec<String> {
    events
        .recent()
        .into_iter()
        .filter_map(|envelope| match envelope.event {
            Event::Notice { message } => Some(message),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn single_file_move_hits_the_wire_and_signals_consumers() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/files/move").json_body(json!({
            "source": "root/docs",
            "files": ["report.pdf"],
            "destination": "root/archive",
            "sourceId": "",
            "destSourceId": "",
        }));
        then.status(200).json_body(json!({ "success": true }));
    });

    let h = harness(&server);
    let outcome = h.service.execute(file_intent(), &view()).await;

    assert!(outcome.ok);
    mock.assert();
    assert_eq!(
        notices(&h.events),
        vec!["Moved \"report.pdf\" to root/archive.".to_string()]
    );

    let recent = h.events.recent();
    let invalidation = recent
        .iter()
        .find_map(|envelope| match &envelope.event {
            Event::CacheInvalidated { folders, source_id } => {
                Some((folders.clone(), source_id.clone()))
            }
            _ => None,
        })
        .expect("invalidation published");
    assert_eq!(
        invalidation.0,
        vec!["root/docs".to_string(), "root/archive".to_string()]
    );
    assert_eq!(invalidation.1, "");

    // Invalidation precedes the reload request.
    assert_eq!(
        event_kinds(&h.events),
        vec!["notice", "cache_invalidated", "folder_reload_requested"]
    );

    assert_eq!(h.sink.opened_count(), 1);
    assert_eq!(h.sink.closed_count(), 1);
    assert!(h.sink.last_outcome().expect("closed").ok);
}

#[tokio::test]
async fn same_source_noop_drop_issues_no_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/files/move");
        then.status(200).json_body(json!({ "success": true }));
    });

    let h = harness(&server);
    let mut intent = file_intent();
    intent.dest_folder = "root/docs".to_string();
    let outcome = h.service.execute(intent, &view()).await;

    assert!(!outcome.ok);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some(stowage_transfer::validate::MSG_SAME_FOLDER)
    );
    mock.assert_hits(0);
    assert_eq!(h.sink.opened_count(), 0);
    assert_eq!(
        notices(&h.events),
        vec![stowage_transfer::validate::MSG_SAME_FOLDER]
    );
}

#[tokio::test]
async fn folder_into_descendant_is_rejected_before_the_network() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/folders/move");
        then.status(200);
    });

    let h = harness(&server);
    let outcome = h
        .service
        .execute(folder_intent("root/docs", "root/docs/sub", "", ""), &view())
        .await;

    assert!(!outcome.ok);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some(stowage_transfer::validate::MSG_DESCENDANT)
    );
    mock.assert_hits(0);
    assert_eq!(h.sink.opened_count(), 0);
}

#[tokio::test]
async fn classified_server_error_closes_the_handle_once() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/files/move");
        then.status(500).json_body(json!({ "error": "disk full" }));
    });

    let h = harness(&server);
    let outcome = h.service.execute(file_intent(), &view()).await;

    assert!(!outcome.ok);
    assert_eq!(outcome.error_message.as_deref(), Some("disk full"));
    assert_eq!(notices(&h.events), vec!["disk full".to_string()]);
    assert_eq!(h.sink.opened_count(), 1);
    assert_eq!(h.sink.closed_count(), 1);
    assert!(!h.sink.last_outcome().expect("closed").ok);
    // No invalidation or reload on failure.
    assert_eq!(event_kinds(&h.events), vec!["notice"]);
}

#[tokio::test]
async fn same_source_folder_move_requests_a_tree_resync() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/folders/move").json_body(json!({
            "source": "root/docs",
            "destination": "root/archive",
            "sourceId": "",
            "destSourceId": "",
        }));
        then.status(200)
            .json_body(json!({ "destination": "root/archive" }));
    });

    let h = harness(&server);
    let outcome = h
        .service
        .execute(folder_intent("root/docs", "root/archive", "", ""), &view())
        .await;

    assert!(outcome.ok);
    assert_eq!(
        notices(&h.events),
        vec!["Moved \"docs\" to root/archive.".to_string()]
    );
    // Displayed folder is the moved folder itself, so a reload follows
    // the resync request.
    assert_eq!(
        event_kinds(&h.events),
        vec![
            "notice",
            "cache_invalidated",
            "tree_resync_requested",
            "folder_reload_requested"
        ]
    );
    assert!(h.sink.last_outcome().expect("closed").ok);
}

#[tokio::test]
async fn cross_source_folder_move_reloads_the_destination() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/folders/move");
        then.status(200);
    });

    let h = harness(&server);
    let outcome = h
        .service
        .execute(folder_intent("docs", "inbox/docs", "a", "b"), &view())
        .await;

    assert!(outcome.ok);
    let recent = h.events.recent();
    let invalidations: Vec<_> = recent
        .iter()
        .filter_map(|envelope| match &envelope.event {
            Event::CacheInvalidated { folders, source_id } => {
                Some((folders.clone(), source_id.clone()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(invalidations.len(), 2);
    assert_eq!(invalidations[0], (vec![String::new()], "a".to_string()));
    assert_eq!(
        invalidations[1],
        (vec!["inbox/docs".to_string()], "b".to_string())
    );

    let reload = recent
        .iter()
        .find_map(|envelope| match &envelope.event {
            Event::FolderReloadRequested { folder, source_id } => {
                Some((folder.clone(), source_id.clone()))
            }
            _ => None,
        })
        .expect("reload requested");
    assert_eq!(reload, ("inbox/docs".to_string(), "b".to_string()));
    assert!(
        !event_kinds(&h.events).contains(&"tree_resync_requested"),
        "cross-source moves do not resync the tree"
    );
}

#[tokio::test]
async fn unaffected_display_skips_the_reload_after_resync() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/folders/move");
        then.status(200);
    });

    let h = harness(&server);
    let elsewhere = ViewContext::new("music/flac", "");
    let outcome = h
        .service
        .execute(
            folder_intent("root/docs", "root/archive", "", ""),
            &elsewhere,
        )
        .await;

    assert!(outcome.ok);
    assert!(!event_kinds(&h.events).contains(&"folder_reload_requested"));
}
