//! # Design
//!
//! - Collapse HTTP failures, error-carrying 2xx bodies, and transport
//!   exceptions into one classified error with a best-effort message.
//! - Keep the error cheap to clone so in-flight results can be shared across
//!   concurrent callers (single-flight trash listing).

use thiserror::Error;

/// Result type for file-store API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Classified failure of a file-store API call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The server answered with a failure status, or a 2xx body carrying an
    /// explicit error field.
    #[error("{message}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Best-effort message: error field, raw body text, or `HTTP <status>`.
        message: String,
    },
    /// The request never produced a usable response.
    #[error("{message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
    /// A success response carried a body this client could not decode.
    #[error("{message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl ClientError {
    /// User-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. } | Self::Transport { message } | Self::Decode { message } => {
                message
            }
        }
    }

    pub(crate) fn transport(path: &str, err: &reqwest::Error) -> Self {
        Self::Transport {
            message: format!("request to {path} failed: {err}"),
        }
    }

    pub(crate) fn body_error(message: String) -> Self {
        Self::Status {
            status: 200,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_preserved_across_variants() {
        let status = ClientError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        let transport = ClientError::Transport {
            message: "down".to_string(),
        };
        assert_eq!(status.message(), "boom");
        assert_eq!(transport.message(), "down");
        assert_eq!(status.to_string(), "boom");
    }
}
