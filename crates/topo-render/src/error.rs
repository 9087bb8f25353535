use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The target document has no heading with this text. The section is
    /// never appended.
    #[error("section '{heading}' not found in document")]
    SectionNotFound { heading: String },

    #[error("invalid section heading '{heading}': {reason}")]
    InvalidHeading { heading: String, reason: String },
}
