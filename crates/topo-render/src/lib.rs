//! # topo-render
//!
//! Publish-path rendering: a [`Graph`](topo_core::Graph) becomes a Mermaid
//! flowchart ([`MermaidRenderer`]), wrapped in a section body
//! ([`diagram_section`]) and spliced into a Markdown document under a named
//! heading ([`patch_section`]).
//!
//! Rendering is pure and deterministic: the same graph and theme always give
//! byte-identical output, so regenerated documents only change when the
//! graph does.

mod document;
mod error;
mod mermaid;

pub use document::{PatchOutcome, patch_section};
pub use error::RenderError;
pub use mermaid::{MermaidRenderer, diagram_section};
