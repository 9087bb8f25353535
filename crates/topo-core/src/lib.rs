//! # topo-core
//!
//! Core graph model shared by every topo crate.
//!
//! This crate provides:
//! - `ResourceNode`, `ConnectionEdge` and the canonically ordered `Graph`
//! - `GraphIdentity`, the key of one application graph inside a repository
//! - `GraphSnapshot`, the persisted, hashed form of a graph
//! - Resource `Category` classification values
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod graph;
pub mod identity;
pub mod snapshot;

pub use enums::Category;
pub use errors::CoreError;
pub use graph::{ConnectionEdge, DEFAULT_RELATION, EdgeKey, Graph, ResourceNode, SourceLocation};
pub use identity::GraphIdentity;
pub use snapshot::{GraphSnapshot, SNAPSHOT_VERSION};
