use thiserror::Error;

/// Errors that can occur while rendering a table.
#[derive(Debug, Error)]
pub enum EmitError {
    /// JSON serialization failure.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
