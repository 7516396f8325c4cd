use thiserror::Error;

/// Client-level error type returned by the HTTP wrapper and every store.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The access token could not be renewed. Callers should route the user
    /// back to sign-in; the session has already been cleared.
    #[error("session expired")]
    SessionExpired,

    /// Business-validation failure translated by a store (e.g. a duplicate
    /// CV file name rejected with 409 by the presigned-URL endpoint).
    #[error("a file with the name '{0}' already exists")]
    DuplicateFileName(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    /// The HTTP status of an `Api` error, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
