use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The review API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The review API returned 429 Too Many Requests. Not retried.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A required setting (token, repository) is missing.
    #[error("review API not configured: {0}")]
    NotConfigured(String),

    /// The comment to update does not exist.
    #[error("comment {0} not found")]
    CommentNotFound(u64),
}
