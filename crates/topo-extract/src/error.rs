//! Extraction and graph building errors.

use std::path::PathBuf;

use thiserror::Error;

/// Longest excerpt of raw extractor output shown in error messages.
pub const RAW_EXCERPT_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extractor exited unsuccessfully. Not retried.
    #[error("extractor `{command}` failed ({status}): {stderr}")]
    ExtractionFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The extractor did not finish in time and was killed.
    #[error("extractor `{command}` timed out after {timeout_secs}s")]
    ExtractionTimedOut { command: String, timeout_secs: u64 },

    /// Output does not have the shape any adapter understands.
    ///
    /// `raw` keeps the complete output; the message shows an excerpt.
    #[error("extractor output does not match a known schema: {reason}{}", excerpt(.raw))]
    SchemaMismatch { reason: String, raw: String },

    /// Two resources share an identifier but differ.
    #[error("resource '{id}' is declared twice with different content: {first} vs {second}")]
    AmbiguousResource {
        id: String,
        first: String,
        second: String,
    },

    #[error("definition path must be absolute: {}", .0.display())]
    RelativeDefinitionPath(PathBuf),

    #[error("invalid classification pattern '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Graph(#[from] topo_core::CoreError),
}

impl ExtractError {
    pub(crate) fn mismatch(reason: impl Into<String>, raw: &str) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

fn excerpt(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match raw.char_indices().nth(RAW_EXCERPT_LIMIT) {
        Some((cut, _)) => format!("\n--- output (truncated) ---\n{}...", &raw[..cut]),
        None => format!("\n--- output ---\n{raw}"),
    }
}
