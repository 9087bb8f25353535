//! # topo-schema
//!
//! JSON Schema registry for topo's persisted and reported types.
//!
//! Model types derive `JsonSchema` in `topo-core` and `topo-diff`; this crate
//! builds the schemas once, validates JSON values against them, and decodes
//! snapshot files (shape check, then version and content-hash check).
//! The `topo schema` command prints schemas from the same registry.

mod error;
mod registry;
mod snapshot;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
pub use snapshot::{decode_snapshot, looks_like_snapshot};
