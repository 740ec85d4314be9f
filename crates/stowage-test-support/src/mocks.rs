//! Scripted doubles for the subsystem's injection points.

use std::sync::Mutex;

use async_trait::async_trait;

use stowage_transfer::{MoveOutcome, ProgressHandle, ProgressSink};
use stowage_trash::ConfirmationProvider;

/// Progress sink that records every lifecycle notification it receives.
#[derive(Default)]
pub struct RecordingProgressSink {
    opened: Mutex<Vec<ProgressHandle>>,
    updates: Mutex<Vec<u64>>,
    closed: Mutex<Vec<(ProgressHandle, MoveOutcome)>>,
}

impl RecordingProgressSink {
    /// Number of handles opened so far.
    ///
    /// # Panics
    ///
    /// Panics if the record mutex has been poisoned.
    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.opened.lock().expect("record mutex poisoned").len()
    }

    /// Number of handles closed so far.
    ///
    /// # Panics
    ///
    /// Panics if the record mutex has been poisoned.
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.closed.lock().expect("record mutex poisoned").len()
    }

    /// Outcome the most recently closed handle carried.
    ///
    /// # Panics
    ///
    /// Panics if the record mutex has been poisoned.
    #[must_use]
    pub fn last_outcome(&self) -> Option<MoveOutcome> {
        self.closed
            .lock()
            .expect("record mutex poisoned")
            .last()
            .map(|(_, outcome)| outcome.clone())
    }

    /// Byte counts reported through `updated`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the record mutex has been poisoned.
    #[must_use]
    pub fn updates(&self) -> Vec<u64> {
        self.updates.lock().expect("record mutex poisoned").clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn opened(&self, handle: &ProgressHandle) {
        self.opened
            .lock()
            .expect("record mutex poisoned")
            .push(handle.clone());
    }

    fn updated(&self, _handle: &ProgressHandle, bytes_done: u64) {
        self.updates
            .lock()
            .expect("record mutex poisoned")
            .push(bytes_done);
    }

    fn closed(&self, handle: &ProgressHandle, outcome: &MoveOutcome) {
        self.closed
            .lock()
            .expect("record mutex poisoned")
            .push((handle.clone(), outcome.clone()));
    }
}

/// Confirmation provider that always answers the same way and records every
/// prompt it was shown.
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    /// Build a provider that answers `answer` to every prompt.
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of prompts presented so far.
    ///
    /// # Panics
    ///
    /// Panics if the prompt mutex has been poisoned.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().expect("prompt mutex poisoned").len()
    }

    /// The prompts presented so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the prompt mutex has been poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl ConfirmationProvider for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.answer
    }
}
