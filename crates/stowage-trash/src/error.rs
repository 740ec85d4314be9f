//! # Design
//!
//! - Message-preserving errors that stop at the subsystem boundary.
//! - Cloneable, because single-flight listing hands the same result to every
//!   concurrent caller.

use thiserror::Error;

use stowage_client::ClientError;

/// Failure of a trash operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrashError {
    /// Another trash action is still running; its button disabled this one.
    #[error("another trash action is in progress")]
    Busy,
    /// The operation requires a non-empty selection of trash keys.
    #[error("no trash items selected")]
    EmptySelection,
    /// The remote call failed; carries the classified message.
    #[error("{0}")]
    Remote(String),
}

impl TrashError {
    /// User-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ClientError> for TrashError {
    fn from(err: ClientError) -> Self {
        Self::Remote(err.message().to_string())
    }
}
