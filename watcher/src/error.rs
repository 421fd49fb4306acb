use splitter_engine::SplitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("invalid watcher url: {0}")]
    InvalidUrl(String),

    #[error("watcher unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request to watcher failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from watcher: {0}")]
    InvalidResponse(String),

    /// The watcher answered with `success: false`. `payload` is its `data`
    /// as sent: the text itself for a string, JSON otherwise.
    #[error("watcher rejected the request: {payload}")]
    Rejected {
        code: Option<String>,
        payload: String,
    },
}

impl From<WatcherError> for SplitError {
    fn from(e: WatcherError) -> Self {
        SplitError::IndexingService(e.to_string())
    }
}
