use thiserror::Error;

/// Errors produced by the backend query and subscription clients.
///
/// Callers on the read paths never surface these: query failures are
/// logged and degraded to zero counts or empty lists at the call site.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request failed with status: {0}")]
    Http(reqwest::StatusCode),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("missing or unparsable Content-Range header")]
    ContentRange,
    #[error("realtime channel error: {0}")]
    Realtime(String),
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
