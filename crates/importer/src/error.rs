use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Provider rejected the request: {0}")]
    ApiError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider has no user with handle {0:?}")]
    UnknownHandle(String),
}

impl ImporterError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, timeouts, rate limiting and 5xx responses are
    /// transient. Malformed payloads and explicit API rejections are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ImporterError::RequestError(e) => !e.is_decode() && !e.is_builder(),
            ImporterError::Timeout(_) => true,
            ImporterError::HttpStatus(status) => *status == 429 || *status >= 500,
            ImporterError::ParseError(_)
            | ImporterError::StorageError(_)
            | ImporterError::ApiError(_)
            | ImporterError::UnknownHandle(_) => false,
        }
    }
}
