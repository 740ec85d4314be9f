//! `StoreClient`: per-endpoint calls against the remote file store.
//!
//! One request per operation, no retries. The CSRF token is treated as an
//! opaque string supplied by the host and forwarded on every mutating call.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use url::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};
use stowage_api_models::{
    DeleteTrashRequest, DeleteTrashResponse, ErrorEnvelope, MoveFilesRequest, MoveFilesResponse,
    MoveFolderRequest, MoveFolderResponse, RestoreTrashRequest, TrashEntry,
};

/// Header carrying the host-supplied CSRF token on mutating calls.
pub const HEADER_CSRF_TOKEN: &str = "x-csrf-token";

const FILES_MOVE_PATH: &str = "/api/files/move";
const FOLDER_MOVE_PATH: &str = "/api/folders/move";
const TRASH_LIST_PATH: &str = "/api/trash";
const TRASH_RESTORE_PATH: &str = "/api/trash/restore";
const TRASH_DELETE_PATH: &str = "/api/trash/delete";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_DELETE_MESSAGE: &str = "Trash deleted.";

/// Connection settings for the remote store, populated by the host.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the file-store API.
    pub base_url: Url,
    /// Opaque CSRF token attached to every mutating request.
    pub csrf_token: String,
    /// Request timeout applied by the underlying client.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Build a config with the default request timeout.
    #[must_use]
    pub fn new(base_url: Url, csrf_token: impl Into<String>) -> Self {
        Self {
            base_url,
            csrf_token: csrf_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the file-store endpoints.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: Url,
    csrf_token: String,
}

impl StoreClient {
    /// Construct a client from the host-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: StoreConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Transport {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url,
            csrf_token: config.csrf_token,
        })
    }

    /// Move a set of files between folders.
    ///
    /// # Errors
    ///
    /// Returns a classified error for transport failures, non-2xx responses,
    /// and 2xx bodies that do not confirm the move.
    pub async fn move_files(&self, request: &MoveFilesRequest) -> ClientResult<()> {
        let body = self.post_mutation(FILES_MOVE_PATH, request).await?;
        let decoded: MoveFilesResponse = decode_or_default(&body)?;
        if let Some(message) = decoded.error {
            return Err(ClientError::body_error(message));
        }
        if !decoded.success {
            return Err(ClientError::body_error(
                "server did not confirm the move".to_string(),
            ));
        }
        Ok(())
    }

    /// Move a single folder, returning the server's response (which may echo
    /// the resolved destination parent).
    ///
    /// # Errors
    ///
    /// Returns a classified error for transport failures, non-2xx responses,
    /// and 2xx bodies carrying an explicit error field.
    pub async fn move_folder(&self, request: &MoveFolderRequest) -> ClientResult<MoveFolderResponse> {
        let body = self.post_mutation(FOLDER_MOVE_PATH, request).await?;
        let decoded: MoveFolderResponse = decode_or_default(&body)?;
        if let Some(message) = decoded.error {
            return Err(ClientError::body_error(message));
        }
        Ok(decoded)
    }

    /// Fetch all trash entries.
    ///
    /// # Errors
    ///
    /// Returns a classified error for transport failures, non-2xx responses,
    /// and undecodable listings.
    pub async fn list_trash(&self) -> ClientResult<Vec<TrashEntry>> {
        let path = TRASH_LIST_PATH;
        let response = self
            .client
            .get(self.endpoint(path)?)
            .send()
            .await
            .map_err(|err| ClientError::transport(path, &err))?;
        let body = into_success_body(response).await?;
        decode(&body)
    }

    /// Restore the given trash entries into the live tree.
    ///
    /// # Errors
    ///
    /// Returns a classified error for transport failures, non-2xx responses,
    /// and 2xx bodies carrying an explicit error field.
    pub async fn restore_trash(&self, request: &RestoreTrashRequest) -> ClientResult<()> {
        let body = self.post_mutation(TRASH_RESTORE_PATH, request).await?;
        let decoded: ErrorEnvelope = decode_or_default(&body)?;
        if let Some(message) = decoded.error {
            return Err(ClientError::body_error(message));
        }
        Ok(())
    }

    /// Permanently delete trash entries, returning the server's confirmation
    /// message.
    ///
    /// # Errors
    ///
    /// Returns a classified error for transport failures, non-2xx responses,
    /// and 2xx bodies carrying an explicit error field.
    pub async fn delete_trash(&self, request: &DeleteTrashRequest) -> ClientResult<String> {
        let body = self.post_mutation(TRASH_DELETE_PATH, request).await?;
        let decoded: DeleteTrashResponse = decode_or_default(&body)?;
        if let Some(message) = decoded.error {
            return Err(ClientError::body_error(message));
        }
        Ok(decoded
            .success
            .unwrap_or_else(|| DEFAULT_DELETE_MESSAGE.to_string()))
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path).map_err(|err| ClientError::Transport {
            message: format!("invalid endpoint URL '{path}': {err}"),
        })
    }

    async fn post_mutation<B>(&self, path: &str, body: &B) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .header(HEADER_CSRF_TOKEN, &self.csrf_token)
            .json(body)
            .send()
            .await
            .map_err(|err| ClientError::transport(path, &err))?;
        into_success_body(response).await
    }
}

/// Extract the body of a success response, classifying failure statuses.
async fn into_success_body(response: Response) -> ClientResult<String> {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if status.is_success() {
        return Ok(text);
    }
    Err(classify_status(status, &text))
}

/// Best-effort message extraction: structured error field, then raw body
/// text, then the bare status code.
fn classify_status(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                trimmed.to_string()
            }
        });

    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|err| ClientError::Decode {
        message: format!("unexpected response body: {err}"),
    })
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> ClientResult<T> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    decode(body)
}
