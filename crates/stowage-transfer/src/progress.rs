//! Progress-handle lifecycle around one transfer attempt.
//!
//! A handle is opened immediately before the network call and must be closed
//! exactly once no matter how the attempt ends. [`ProgressGuard`] is the
//! guaranteed-release construct: `finish` closes the handle with the real
//! outcome, and dropping an unfinished guard closes it as failed, covering
//! early returns and panics alike.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::model::MoveOutcome;

/// Outcome message recorded when a guard is dropped without `finish`.
const INTERRUPTED_MESSAGE: &str = "transfer interrupted";

/// Lifecycle state of a progress handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// The attempt is still running.
    Open,
    /// The handle has been closed; it will never reopen.
    Closed,
}

/// One transfer attempt's progress handle. Mutated only by the owning
/// executor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressHandle {
    /// Unique identifier for this attempt.
    pub id: Uuid,
    /// Action label (currently always a move).
    pub action: String,
    /// Short label for the moved item(s).
    pub item_label: String,
    /// Total bytes of the transfer, when known in advance.
    pub total_bytes: u64,
    /// Whether `total_bytes` is meaningful.
    pub bytes_known: bool,
    /// Whether the UI should render an indeterminate bar (set when byte
    /// totals are not known in advance, e.g. folder moves).
    pub indeterminate: bool,
    /// Source folder of the transfer.
    pub source: String,
    /// Destination folder of the transfer.
    pub destination: String,
    /// Current lifecycle state.
    pub state: HandleState,
}

/// Parameters for opening a progress handle.
#[derive(Debug, Clone)]
pub struct ProgressParams {
    /// Action label.
    pub action: String,
    /// Short label for the moved item(s).
    pub item_label: String,
    /// Total bytes, when known.
    pub total_bytes: u64,
    /// Whether the total covers the whole selection.
    pub bytes_known: bool,
    /// Source folder.
    pub source: String,
    /// Destination folder.
    pub destination: String,
}

/// Consumer of progress-handle lifecycle notifications, implemented by the
/// host UI.
pub trait ProgressSink: Send + Sync {
    /// A handle was opened for a starting attempt.
    fn opened(&self, handle: &ProgressHandle);

    /// Bytes transferred so far for a running attempt.
    fn updated(&self, handle: &ProgressHandle, bytes_done: u64);

    /// The attempt finished; the handle will not be used again.
    fn closed(&self, handle: &ProgressHandle, outcome: &MoveOutcome);
}

/// Default sink that records the lifecycle in the subsystem's logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn opened(&self, handle: &ProgressHandle) {
        debug!(id = %handle.id, item = %handle.item_label, "progress handle opened");
    }

    fn updated(&self, handle: &ProgressHandle, bytes_done: u64) {
        debug!(id = %handle.id, bytes_done, "progress updated");
    }

    fn closed(&self, handle: &ProgressHandle, outcome: &MoveOutcome) {
        debug!(id = %handle.id, ok = outcome.ok, "progress handle closed");
    }
}

/// Opens progress handles against an injected sink.
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<dyn ProgressSink>,
}

impl ProgressReporter {
    /// Build a reporter that notifies the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self { sink }
    }

    /// Open a handle for a starting attempt. The returned guard closes it
    /// exactly once.
    #[must_use]
    pub fn open(&self, params: ProgressParams) -> ProgressGuard {
        let handle = ProgressHandle {
            id: Uuid::new_v4(),
            action: params.action,
            item_label: params.item_label,
            total_bytes: params.total_bytes,
            bytes_known: params.bytes_known,
            indeterminate: !params.bytes_known,
            source: params.source,
            destination: params.destination,
            state: HandleState::Open,
        };
        self.sink.opened(&handle);
        ProgressGuard {
            handle: Some(handle),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(Arc::new(TracingProgressSink))
    }
}

/// Scoped ownership of one open progress handle.
pub struct ProgressGuard {
    handle: Option<ProgressHandle>,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressGuard {
    /// Report transferred bytes for the running attempt.
    pub fn update(&mut self, bytes_done: u64) {
        if let Some(handle) = &self.handle {
            self.sink.updated(handle, bytes_done);
        }
    }

    /// Close the handle with the attempt's real outcome.
    pub fn finish(mut self, outcome: &MoveOutcome) {
        self.close(outcome);
    }

    fn close(&mut self, outcome: &MoveOutcome) {
        if let Some(mut handle) = self.handle.take() {
            handle.state = HandleState::Closed;
            self.sink.closed(&handle, outcome);
        }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        let interrupted = MoveOutcome::failure(INTERRUPTED_MESSAGE);
        self.close(&interrupted);
    }
}
