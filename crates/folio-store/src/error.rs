//! Error types for folio-store

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("content store request timed out after {0:?}")]
    Timeout(Duration),

    #[error("content store returned HTTP {status}")]
    Http { status: u16 },

    #[error("failed to decode store response: {0}")]
    Decode(String),

    #[error("request cancelled by caller")]
    Cancelled,

    #[error("failed to construct HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Engine(#[from] folio_core::EngineError),
}

impl StoreError {
    /// Whether the caller may retry with backoff. The client itself
    /// never retries; it only surfaces the failure. A 5xx status is a
    /// transient store-side condition; 4xx is a permanent request error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_)
                | StoreError::Timeout(_)
                | StoreError::Http {
                    status: 500..=599
                }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
