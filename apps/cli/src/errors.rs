use thiserror::Error;

/// Application-level error type for operations the CLI invokes directly.
///
/// Connectivity failures never appear here: the session store catches
/// `ApiError` at its boundary and converts it into user-visible session
/// state (transcript sentinels and error fields). Cache deserialization
/// failures are swallowed inside the recent-items cache and degrade to an
/// empty list. Nothing in this application is fatal past startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable required input. Blocks the action before any
    /// network call; shown inline where the user acted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local I/O failure (file export and similar).
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
