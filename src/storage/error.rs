//! Storage adapter error taxonomy

use thiserror::Error;

use crate::providers::ProviderError;

/// Errors surfaced by the storage adapter
#[derive(Error, Debug)]
pub enum StorageError {
    /// Empty or unusable upload input; no network call was made
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// Network, connect or timeout failure talking to the blob service.
    /// After a timed-out upload the object may or may not exist remotely.
    #[error("Blob service unreachable: {0}")]
    Transport(String),

    /// Structured refusal from the blob service (quota, auth, bad request)
    #[error("Blob service rejected the request: {message}")]
    RemoteRejection { status: Option<u16>, message: String },

    /// URL that does not point at a stored asset
    #[error("Malformed asset URL: {0}")]
    MalformedUrl(String),
}

impl From<ProviderError> for StorageError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http(e) => StorageError::Transport(e.to_string()),
            e @ ProviderError::Timeout { .. } => StorageError::Transport(e.to_string()),
            ProviderError::ApiError { status, message } => StorageError::RemoteRejection {
                status: Some(status),
                message,
            },
            e @ ProviderError::RateLimited { .. } => StorageError::RemoteRejection {
                status: Some(429),
                message: e.to_string(),
            },
            e @ (ProviderError::AuthFailed(_)
            | ProviderError::ParseError(_)
            | ProviderError::NotConfigured(_)) => StorageError::RemoteRejection {
                status: None,
                message: e.to_string(),
            },
        }
    }
}
