//! Schema validation error types.

use thiserror::Error;

/// Errors from the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("validation failed against '{schema}': {}", errors.join("; "))]
    ValidationFailed {
        schema: String,
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema compilation error.
    #[error("schema compilation error: {0}")]
    Compile(String),

    /// Text is not JSON at all.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Valid shape, but the snapshot itself is inconsistent (version, hash, graph invariants).
    #[error(transparent)]
    Snapshot(#[from] topo_core::CoreError),
}
