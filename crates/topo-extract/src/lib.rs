//! # topo-extract
//!
//! Turns an infrastructure definition file into a [`topo_core::Graph`].
//!
//! Two sources feed the same pipeline:
//! - the configured external extractor ([`Extractor`]), whose JSON output is
//!   decoded by the first matching [`OutputAdapter`];
//! - a direct scan of the Bicep file ([`parse_bicep`]) when no extractor is
//!   configured.
//!
//! Both produce a [`RawGraph`], which [`GraphBuilder`] classifies, resolves
//! and validates into a canonical graph.

mod adapter;
mod bicep;
mod builder;
mod classify;
mod error;
mod raw;
mod resolve;
mod runner;

pub use adapter::{
    FlatLocation, InlineConnections, NestedLocation, OutputAdapter, adapters, decode_document,
    decode_output,
};
pub use bicep::parse_bicep;
pub use builder::{BuildOutcome, GraphBuilder, SkippedRelation, TARGET_REF};
pub use classify::Classifier;
pub use error::{ExtractError, RAW_EXCERPT_LIMIT};
pub use raw::{RawGraph, RawRelation, RawResource};
pub use resolve::{Endpoint, Resolver};
pub use runner::Extractor;

use std::path::Path;

use topo_config::ExtractorConfig;

/// Where the raw graph came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// The configured extractor command.
    Extractor,
    /// Direct scan of the definition file.
    Direct,
}

/// Obtain the raw graph for `definition` (absolute path).
///
/// Uses the configured extractor unless `force_direct` is set or no program
/// is configured.
///
/// # Errors
///
/// Propagates [`ExtractError`] from the extractor run, output decoding or
/// reading the definition file.
pub async fn extract_raw(
    config: &ExtractorConfig,
    definition: &Path,
    force_direct: bool,
) -> Result<(RawGraph, ExtractionMode), ExtractError> {
    if !definition.is_absolute() {
        return Err(ExtractError::RelativeDefinitionPath(definition.to_path_buf()));
    }
    if force_direct || !config.is_configured() {
        tracing::debug!(path = %definition.display(), "scanning definition file directly");
        let content = tokio::fs::read_to_string(definition).await?;
        return Ok((parse_bicep(&content), ExtractionMode::Direct));
    }
    let output = Extractor::new(config.clone()).run(definition).await?;
    Ok((decode_output(&output)?, ExtractionMode::Extractor))
}
