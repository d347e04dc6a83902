use thiserror::Error;

/// Errors raised while resolving a target description against a snapshot
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The request cannot be sent to the AI (e.g. empty target description)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The AI answered with a payload matching neither known response shape
    #[error("Malformed AI response while locating \"{description}\": {reason}; raw response: {raw}")]
    MalformedResponse {
        description: String,
        reason: String,
        raw: String,
    },

    /// The AI collaborator itself failed (transport, quota, ...)
    #[error("AI call failed: {0}")]
    AiCallFailed(String),

    #[error("Failed to decode screenshot: {0}")]
    ScreenshotDecode(String),

    #[error("Failed to parse snapshot: {0}")]
    SnapshotParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, LocatorError>;
