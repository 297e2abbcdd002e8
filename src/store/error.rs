use thiserror::Error;

/// Failures surfaced by the case-store collaborator. Every store call is
/// network I/O in production and may fail; nothing is assumed to succeed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
