#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Event bus connecting the transfer/trash subsystem to its view-layer
//! consumers.
//!
//! The bus provides a typed event enum, sequential identifiers, and replay of
//! recent events for subscribers that attach late (a folder-tree widget
//! mounted after a move completed, for example). Internally it uses
//! `tokio::broadcast` with a bounded buffer; when the channel overflows, the
//! oldest events are dropped. Publication is synchronous, so events emitted
//! by one operation are observed in emission order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};

/// Identifier assigned to each event published on the bus.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
const DEFAULT_REPLAY_CAPACITY: usize = 256;

/// Typed signals emitted by the transfer and trash subsystems.
///
/// Consumers are statically known collaborators: folder-tree and folder-stat
/// widgets react to [`Event::CacheInvalidated`], the file list reacts to the
/// reload/resync requests, and the toast area renders [`Event::Notice`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Folder-scoped caches (stats, tree nodes, file lists) under one storage
    /// source are stale and must be refetched.
    CacheInvalidated {
        /// Affected folder paths, de-duplicated.
        folders: Vec<String>,
        /// Storage source the folders belong to.
        source_id: String,
    },
    /// The view layer should reload the named folder's listing.
    FolderReloadRequested {
        /// Folder to reload.
        folder: String,
        /// Storage source of the folder.
        source_id: String,
    },
    /// A same-source folder move completed; the tree widget should move the
    /// node from `source` to `destination` without a full refetch.
    TreeResyncRequested {
        /// Previous full path of the moved folder.
        source: String,
        /// Folder the moved node now lives under.
        destination: String,
        /// Storage source of both paths.
        source_id: String,
    },
    /// Transient user-facing message (confirmation or failure).
    Notice {
        /// Message text, already formatted for display.
        message: String,
    },
    /// The trash listing changed; open trash panels should refetch it.
    TrashListChanged,
    /// The trash was emptied; an open trash panel should close itself.
    TrashPanelCloseRequested,
}

impl Event {
    /// Machine-friendly discriminator, stable across renames of the variants.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CacheInvalidated { .. } => "cache_invalidated",
            Event::FolderReloadRequested { .. } => "folder_reload_requested",
            Event::TreeResyncRequested { .. } => "tree_resync_requested",
            Event::Notice { .. } => "notice",
            Event::TrashListChanged => "trash_list_changed",
            Event::TrashPanelCloseRequested => "trash_panel_close_requested",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned at publication.
    pub id: EventId,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// The published event.
    pub event: Event,
}

/// Snapshot of what the host view is currently displaying, supplied by the
/// host once per UI interaction. Entry points take this explicitly instead of
/// reading ambient state, so two panes showing different folders cannot
/// corrupt each other's reloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    /// Folder currently shown in the active pane.
    pub displayed_folder: String,
    /// Storage source of the displayed folder.
    pub displayed_source_id: String,
}

impl ViewContext {
    /// Convenience constructor.
    #[must_use]
    pub fn new(displayed_folder: impl Into<String>, displayed_source_id: impl Into<String>) -> Self {
        Self {
            displayed_folder: displayed_folder.into(),
            displayed_source_id: displayed_source_id.into(),
        }
    }
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    buffer: Arc<Mutex<VecDeque<EventEnvelope>>>,
    next_id: Arc<std::sync::atomic::AtomicU64>,
    replay_capacity: usize,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// The broadcast channel uses the same capacity as the in-memory replay
    /// buffer, ensuring dropped events impact both structures consistently.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            next_id: Arc::new(std::sync::atomic::AtomicU64::new(1)),
            replay_capacity: capacity,
        }
    }

    /// Construct a bus with the default in-memory buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Publish a new event to the bus, assigning it a sequential identifier.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    pub fn publish(&self, event: Event) -> EventId {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };

        {
            let mut buffer = self.buffer.lock().expect("event buffer mutex poisoned");
            if buffer.len() == self.replay_capacity {
                buffer.pop_front();
            }
            buffer.push_back(envelope.clone());
        }

        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to the bus, replaying any buffered events newer than `since_id`.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    #[must_use]
    pub fn subscribe(&self, since_id: Option<EventId>) -> EventStream {
        let mut backlog = VecDeque::new();
        if let Some(since) = since_id {
            let buffer = self.buffer.lock().expect("event buffer mutex poisoned");
            for item in buffer.iter() {
                if item.id > since {
                    backlog.push_back(item.clone());
                }
            }
        }

        let receiver = self.sender.subscribe();
        EventStream { backlog, receiver }
    }

    /// Returns the last assigned identifier, if any events have been published.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        let buffer = self.buffer.lock().expect("event buffer mutex poisoned");
        buffer.back().map(|event| event.id)
    }

    /// Snapshot of the replay buffer, oldest first. Test-friendly way to
    /// assert on everything published so far without racing a receiver.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    #[must_use]
    pub fn recent(&self) -> Vec<EventEnvelope> {
        let buffer = self.buffer.lock().expect("event buffer mutex poisoned");
        buffer.iter().cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper that yields events either from the replay backlog or from
/// the live broadcast channel.
pub struct EventStream {
    backlog: VecDeque<EventEnvelope>,
    receiver: Receiver<EventEnvelope>,
}

impl EventStream {
    /// Receive the next event, respecting the replay backlog first.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }

        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
