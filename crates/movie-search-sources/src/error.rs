use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-2xx HTTP status
    #[error("request failed with HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered but reported no match
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound(_))
    }
}
