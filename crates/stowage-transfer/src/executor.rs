//! Transfer execution: one validated intent, one request, one classified
//! outcome.
//!
//! Within an attempt the order is strict: open handle → network call →
//! classify → invalidate/reload → close handle. Independent attempts carry
//! their own intent and handle and are not ordered relative to each other.

use tracing::info;

use stowage_api_models::{MoveFilesRequest, MoveFolderRequest};
use stowage_client::StoreClient;
use stowage_events::{Event, EventBus, ViewContext};

use crate::error::TransferError;
use crate::invalidate::invalidate_folders;
use crate::model::{MoveOutcome, TransferIntent, TransferPayload, folder_label};
use crate::progress::{ProgressParams, ProgressReporter};
use crate::validate::{normalize_path, validate_move};

/// Executes move intents against the remote store and keeps dependent caches
/// coherent through the event bus.
#[derive(Clone)]
pub struct TransferService {
    client: StoreClient,
    events: EventBus,
    progress: ProgressReporter,
}

impl TransferService {
    /// Build a service over the given transport, event bus, and progress
    /// reporter.
    #[must_use]
    pub fn new(client: StoreClient, events: EventBus, progress: ProgressReporter) -> Self {
        Self {
            client,
            events,
            progress,
        }
    }

    /// Execute one move intent: exactly one request, no retry.
    ///
    /// Local validation runs first; a rejection publishes a notice and
    /// returns a failed outcome without opening a progress handle or touching
    /// the network. Otherwise the attempt runs under a progress guard that
    /// closes the handle exactly once on every exit path. Errors never
    /// propagate past the returned [`MoveOutcome`].
    pub async fn execute(&self, intent: TransferIntent, view: &ViewContext) -> MoveOutcome {
        if let Err(err) = validate_move(&intent) {
            let message = err.message().to_string();
            self.events.publish(Event::Notice {
                message: message.clone(),
            });
            return MoveOutcome::failure(message);
        }

        let guard = self.progress.open(ProgressParams {
            action: "move".to_string(),
            item_label: intent.item_label(),
            total_bytes: intent.total_bytes,
            bytes_known: intent.bytes_known,
            source: intent.source_folder.clone(),
            destination: intent.dest_folder.clone(),
        });

        let result = self.dispatch(&intent, view).await;
        let outcome = match result {
            Ok(()) => {
                info!(
                    items = intent.item_count(),
                    destination = %intent.dest_folder,
                    "move completed"
                );
                MoveOutcome::success()
            }
            Err(err) => {
                let message = err.message().to_string();
                self.events.publish(Event::Notice {
                    message: message.clone(),
                });
                MoveOutcome::failure(message)
            }
        };

        guard.finish(&outcome);
        outcome
    }

    async fn dispatch(
        &self,
        intent: &TransferIntent,
        view: &ViewContext,
    ) -> Result<(), TransferError> {
        match &intent.payload {
            TransferPayload::Files(names) => self.move_files(intent, names, view).await,
            TransferPayload::Folder(path) => self.move_folder(intent, path, view).await,
        }
    }

    async fn move_files(
        &self,
        intent: &TransferIntent,
        names: &[String],
        view: &ViewContext,
    ) -> Result<(), TransferError> {
        let request = MoveFilesRequest {
            source: intent.source_folder.clone(),
            files: names.to_vec(),
            destination: intent.dest_folder.clone(),
            source_id: intent.source_id.clone(),
            dest_source_id: intent.dest_source_id.clone(),
        };
        self.client.move_files(&request).await?;

        self.events.publish(Event::Notice {
            message: moved_files_message(names, &intent.dest_folder),
        });
        invalidate_folders(
            &self.events,
            &[
                (intent.source_folder.clone(), intent.source_id.clone()),
                (intent.dest_folder.clone(), intent.dest_source_id.clone()),
            ],
        );
        self.events.publish(Event::FolderReloadRequested {
            folder: view.displayed_folder.clone(),
            source_id: view.displayed_source_id.clone(),
        });
        Ok(())
    }

    async fn move_folder(
        &self,
        intent: &TransferIntent,
        path: &str,
        view: &ViewContext,
    ) -> Result<(), TransferError> {
        let request = MoveFolderRequest {
            source: path.to_string(),
            destination: intent.dest_folder.clone(),
            source_id: intent.source_id.clone(),
            dest_source_id: intent.dest_source_id.clone(),
        };
        let response = self.client.move_folder(&request).await?;
        let resolved_dest = response
            .destination
            .unwrap_or_else(|| intent.dest_folder.clone());

        self.events.publish(Event::Notice {
            message: moved_folder_message(path, &resolved_dest),
        });
        invalidate_folders(
            &self.events,
            &[
                (intent.source_folder.clone(), intent.source_id.clone()),
                (resolved_dest.clone(), intent.dest_source_id.clone()),
            ],
        );

        if intent.same_source() {
            self.events.publish(Event::TreeResyncRequested {
                source: path.to_string(),
                destination: resolved_dest.clone(),
                source_id: intent.source_id.clone(),
            });
            if view.displayed_source_id == intent.source_id
                && displayed_folder_affected(view, path, &intent.source_folder, &resolved_dest)
            {
                self.events.publish(Event::FolderReloadRequested {
                    folder: view.displayed_folder.clone(),
                    source_id: view.displayed_source_id.clone(),
                });
            }
        } else {
            self.events.publish(Event::FolderReloadRequested {
                folder: resolved_dest,
                source_id: intent.dest_source_id.clone(),
            });
        }
        Ok(())
    }
}

/// Whether a same-source folder move touches what the view is displaying:
/// the old parent, the destination, or the moved folder itself (including
/// anything inside it).
fn displayed_folder_affected(
    view: &ViewContext,
    moved_path: &str,
    old_parent: &str,
    destination: &str,
) -> bool {
    let displayed = normalize_path(&view.displayed_folder);
    let moved = normalize_path(moved_path);
    displayed == normalize_path(old_parent)
        || displayed == normalize_path(destination)
        || displayed == moved
        || displayed.starts_with(&format!("{moved}/"))
}

fn moved_files_message(names: &[String], destination: &str) -> String {
    match names {
        [single] => format!("Moved \"{single}\" to {destination}."),
        many => format!("Moved {} items to {destination}.", many.len()),
    }
}

fn moved_folder_message(path: &str, destination: &str) -> String {
    format!("Moved \"{}\" to {destination}.", folder_label(path))
}

