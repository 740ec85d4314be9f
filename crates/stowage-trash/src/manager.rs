//! `TrashManager`: the owner of the trash listing and its mutations.
//!
//! The listing is the one shared resource with a consistency risk under
//! concurrency — a trash panel opening, a manual refresh, and the auto-purge
//! sweep can all ask for it in the same tick — so fetches are de-duplicated
//! through a shared in-flight future rather than a lock held across awaits.
//! Mutating actions run under a busy gate that mirrors the panel's
//! `Idle → Busy(action) → Idle` button state.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::warn;

use stowage_api_models::{DeleteTrashRequest, RestoreTrashRequest, TrashEntry};
use stowage_client::StoreClient;
use stowage_events::{Event, EventBus, ViewContext};

use crate::error::TrashError;

type ListFuture = Shared<BoxFuture<'static, Result<Vec<TrashEntry>, TrashError>>>;

/// Mutating trash actions, mirroring the panel's action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashAction {
    /// Manual refresh of the listing.
    Refresh,
    /// Restoring entries into the live tree.
    Restore,
    /// Permanently deleting entries.
    Delete,
}

/// What a delete call should remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrashSelection {
    /// A specific set of trash keys.
    Named(Vec<String>),
    /// Everything currently in the trash.
    All,
}

/// Result of a delete call that reached the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The user confirmed and the server completed the delete.
    Completed,
    /// The user declined; nothing was sent.
    Declined,
}

/// Asks the user to confirm a destructive action. Implemented by the host
/// (an in-app dialog, or a blocking native confirm as a fallback) and
/// injected here so the manager never touches UI machinery.
#[async_trait]
pub trait ConfirmationProvider: Send + Sync {
    /// Present the prompt and return whether the user confirmed.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Owns trash listing state and executes trash mutations.
#[derive(Clone)]
pub struct TrashManager {
    client: StoreClient,
    events: EventBus,
    confirm: Arc<dyn ConfirmationProvider>,
    inflight: Arc<Mutex<Option<ListFuture>>>,
    busy: Arc<Mutex<Option<TrashAction>>>,
    entries: Arc<Mutex<Vec<TrashEntry>>>,
}

impl TrashManager {
    /// Build a manager over the given transport, event bus, and confirmation
    /// provider.
    #[must_use]
    pub fn new(
        client: StoreClient,
        events: EventBus,
        confirm: Arc<dyn ConfirmationProvider>,
    ) -> Self {
        Self {
            client,
            events,
            confirm,
            inflight: Arc::new(Mutex::new(None)),
            busy: Arc::new(Mutex::new(None)),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fetch the trash listing. Concurrent calls while a fetch is
    /// outstanding share the same pending result instead of issuing a second
    /// request; the slot clears once the fetch resolves, so later calls
    /// fetch fresh data.
    ///
    /// # Errors
    ///
    /// Returns the classified remote failure, shared by every caller of the
    /// same in-flight fetch.
    pub async fn list(&self) -> Result<Vec<TrashEntry>, TrashError> {
        self.shared_list().await
    }

    /// Snapshot of the last successful listing.
    ///
    /// # Panics
    ///
    /// Panics if the entries mutex has been poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<TrashEntry> {
        self.entries.lock().expect("trash entries mutex poisoned").clone()
    }

    /// The action currently holding the busy gate, if any.
    ///
    /// # Panics
    ///
    /// Panics if the busy mutex has been poisoned.
    #[must_use]
    pub fn busy_action(&self) -> Option<TrashAction> {
        *self.busy.lock().expect("trash busy mutex poisoned")
    }

    /// Manual refresh: refetch the listing and tell panels it changed.
    ///
    /// # Errors
    ///
    /// Returns [`TrashError::Busy`] while another action runs, or the remote
    /// failure from the fetch.
    pub async fn refresh(&self) -> Result<Vec<TrashEntry>, TrashError> {
        let _gate = self.begin(TrashAction::Refresh)?;
        let entries = self.shared_list().await?;
        self.events.publish(Event::TrashListChanged);
        Ok(entries)
    }

    /// Restore the given trash keys into the live tree, then refresh both
    /// the listing and the displayed folder.
    ///
    /// # Errors
    ///
    /// Returns [`TrashError::EmptySelection`] for an empty key set,
    /// [`TrashError::Busy`] while another action runs, or the classified
    /// remote failure.
    pub async fn restore(&self, names: &[String], view: &ViewContext) -> Result<(), TrashError> {
        if names.is_empty() {
            return Err(TrashError::EmptySelection);
        }
        let _gate = self.begin(TrashAction::Restore)?;

        let request = RestoreTrashRequest {
            files: names.to_vec(),
        };
        self.client.restore_trash(&request).await?;

        self.events.publish(Event::Notice {
            message: restored_message(names),
        });
        if let Err(err) = self.shared_list().await {
            warn!(error = %err, "trash refetch after restore failed");
        }
        self.events.publish(Event::TrashListChanged);
        self.events.publish(Event::FolderReloadRequested {
            folder: view.displayed_folder.clone(),
            source_id: view.displayed_source_id.clone(),
        });
        Ok(())
    }

    /// Permanently delete trash entries, gated behind the injected
    /// confirmation step. Declining issues no request at all. A confirmed
    /// delete-all additionally clears the cached listing and asks open trash
    /// panels to close.
    ///
    /// # Errors
    ///
    /// Returns [`TrashError::EmptySelection`] for an empty named set,
    /// [`TrashError::Busy`] while another action runs, or the classified
    /// remote failure.
    pub async fn delete(&self, selection: TrashSelection) -> Result<DeleteStatus, TrashError> {
        if let TrashSelection::Named(names) = &selection
            && names.is_empty()
        {
            return Err(TrashError::EmptySelection);
        }
        let _gate = self.begin(TrashAction::Delete)?;

        let prompt = match &selection {
            TrashSelection::All => {
                "Permanently delete all trash items? This cannot be undone.".to_string()
            }
            TrashSelection::Named(names) => format!(
                "Permanently delete {} trash item(s)? This cannot be undone.",
                names.len()
            ),
        };
        if !self.confirm.confirm(&prompt).await {
            return Ok(DeleteStatus::Declined);
        }

        let request = match &selection {
            TrashSelection::All => DeleteTrashRequest::all(),
            TrashSelection::Named(names) => DeleteTrashRequest::named(names.clone()),
        };
        let message = self.client.delete_trash(&request).await?;
        self.events.publish(Event::Notice { message });

        if matches!(selection, TrashSelection::All) {
            self.entries
                .lock()
                .expect("trash entries mutex poisoned")
                .clear();
            self.events.publish(Event::TrashPanelCloseRequested);
        } else if let Err(err) = self.shared_list().await {
            warn!(error = %err, "trash refetch after delete failed");
        }
        self.events.publish(Event::TrashListChanged);
        Ok(DeleteStatus::Completed)
    }

    /// Batch delete used by the auto-purge sweep: no confirmation (it is a
    /// policy decision, not a user gesture) and no busy gate (it never maps
    /// to a panel button).
    pub(crate) async fn delete_for_purge(&self, names: Vec<String>) -> Result<(), TrashError> {
        let request = DeleteTrashRequest::named(names);
        self.client.delete_trash(&request).await?;
        if let Err(err) = self.shared_list().await {
            warn!(error = %err, "trash refetch after purge failed");
        }
        self.events.publish(Event::TrashListChanged);
        Ok(())
    }

    fn shared_list(&self) -> ListFuture {
        let mut slot = self
            .inflight
            .lock()
            .expect("trash in-flight mutex poisoned");
        if let Some(pending) = slot.as_ref() {
            return pending.clone();
        }

        let client = self.client.clone();
        let inflight = Arc::clone(&self.inflight);
        let entries = Arc::clone(&self.entries);
        let future = async move {
            let result = client
                .list_trash()
                .await
                .map_err(TrashError::from);
            if let Ok(items) = &result {
                *entries.lock().expect("trash entries mutex poisoned") = items.clone();
            }
            // Clear the slot so the next call starts a fresh fetch; callers
            // already holding this future still see the same result.
            inflight
                .lock()
                .expect("trash in-flight mutex poisoned")
                .take();
            result
        }
        .boxed()
        .shared();

        *slot = Some(future.clone());
        future
    }

    fn begin(&self, action: TrashAction) -> Result<BusyGuard, TrashError> {
        let mut busy = self.busy.lock().expect("trash busy mutex poisoned");
        if busy.is_some() {
            return Err(TrashError::Busy);
        }
        *busy = Some(action);
        Ok(BusyGuard {
            slot: Arc::clone(&self.busy),
        })
    }
}

/// Re-enables the action buttons when the owning action ends, error or not.
struct BusyGuard {
    slot: Arc<Mutex<Option<TrashAction>>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.slot.lock().expect("trash busy mutex poisoned").take();
    }
}

fn restored_message(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("\"{name}\"")).collect();
    format!("Restored {}.", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    use httpmock::MockServer;

    use stowage_test_support::fixtures::store_client;

    /// Unit-test stand-in for `ScriptedConfirm::new(true)`; the test using it
    /// never reaches the confirmation step.
    struct AlwaysConfirm;

    #[async_trait]
    impl ConfirmationProvider for AlwaysConfirm {
        async fn confirm(&self, _prompt: &str) -> bool {
            true
        }
    }

    fn manager(server: &MockServer) -> (TrashManager, EventBus) {
        let events = EventBus::new();
        let manager = TrashManager::new(
            store_client(&server.base_url()),
            events.clone(),
            Arc::new(AlwaysConfirm) as Arc<dyn ConfirmationProvider>,
        );
        (manager, events)
    }

    #[test]
    fn restore_notice_names_every_item() {
        assert_eq!(restored_message(&["a.txt".to_string()]), "Restored \"a.txt\".");
        assert_eq!(
            restored_message(&["a.txt".to_string(), "b.txt".to_string()]),
            "Restored \"a.txt\", \"b.txt\"."
        );
    }

    #[tokio::test]
    async fn busy_gate_blocks_overlapping_actions() {
        let server = MockServer::start_async().await;
        let (manager, _events) = manager(&server);

        let gate = manager.begin(TrashAction::Restore).expect("gate acquired");
        assert_eq!(manager.busy_action(), Some(TrashAction::Restore));
        assert_eq!(
            manager.begin(TrashAction::Delete).err(),
            Some(TrashError::Busy)
        );
        let view = ViewContext::new("root", "");
        assert_eq!(
            manager.restore(&["k1".to_string()], &view).await,
            Err(TrashError::Busy)
        );

        drop(gate);
        assert_eq!(manager.busy_action(), None);
    }
}
