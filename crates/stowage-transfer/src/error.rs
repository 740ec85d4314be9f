//! # Design
//!
//! - Split local validation rejections from remote/transport failures, the
//!   two halves of the error taxonomy this subsystem surfaces.
//! - Both carry a ready-to-display message; nothing propagates past the
//!   subsystem boundary as a raw error.

use thiserror::Error;

use stowage_client::ClientError;

/// Failure of one transfer attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Rejected locally before any network call was made.
    #[error("{0}")]
    Rejected(String),
    /// The remote call failed, or its response classified as an error.
    #[error("{0}")]
    Transport(String),
}

impl TransferError {
    /// Build a local rejection with the given user-facing message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// User-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(message) | Self::Transport(message) => message,
        }
    }

    /// Whether this failure was produced without touching the network.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<ClientError> for TransferError {
    fn from(err: ClientError) -> Self {
        Self::Transport(err.message().to_string())
    }
}
