//! Replacement of one Markdown section's body.
//!
//! Headings are located with a CommonMark parser, so `#` lines inside fenced
//! code blocks are not mistaken for headings. Only the bytes between the
//! target heading line and the next heading of the same or higher level are
//! rewritten.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::error::RenderError;

/// Result of patching a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub text: String,
    /// False when the section already had exactly this content.
    pub changed: bool,
}

struct Heading {
    level: HeadingLevel,
    title: String,
    range: Range<usize>,
}

/// Replace the body of the section titled `heading` with `content`.
///
/// `heading` is either the bare title (`Architecture`, any level) or an ATX
/// heading (`## Architecture`, that level only).
///
/// # Errors
///
/// - [`RenderError::SectionNotFound`] when no heading matches. The section
///   is never appended.
/// - [`RenderError::InvalidHeading`] when `heading` has no title or more
///   than six `#`.
pub fn patch_section(
    document: &str,
    heading: &str,
    content: &str,
) -> Result<PatchOutcome, RenderError> {
    let (wanted_level, title) = parse_heading_arg(heading)?;
    let headings = headings(document);

    let Some(index) = headings.iter().position(|h| {
        h.title == title && wanted_level.is_none_or(|level| h.level == level)
    }) else {
        return Err(RenderError::SectionNotFound {
            heading: heading.trim().to_string(),
        });
    };
    let target = &headings[index];

    let body_start = line_end(document, target.range.end.saturating_sub(1).max(target.range.start));
    let next = headings[index + 1..]
        .iter()
        .find(|h| h.level <= target.level);
    let body_end = next.map_or(document.len(), |h| line_start(document, h.range.start));

    let mut text = String::with_capacity(document.len() + content.len());
    text.push_str(&document[..body_start]);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text.push('\n');
    text.push_str(content.trim_end_matches('\n'));
    text.push('\n');
    if next.is_some() {
        text.push('\n');
    }
    text.push_str(&document[body_end..]);

    let changed = text != document;
    tracing::debug!(section = %title, changed, "patched document section");
    Ok(PatchOutcome { text, changed })
}

fn parse_heading_arg(heading: &str) -> Result<(Option<HeadingLevel>, &str), RenderError> {
    let trimmed = heading.trim();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    let title = trimmed[hashes..].trim();
    let invalid = |reason: &str| RenderError::InvalidHeading {
        heading: heading.to_string(),
        reason: reason.to_string(),
    };
    if title.is_empty() {
        return Err(invalid("heading has no title"));
    }
    if hashes == 0 {
        return Ok((None, title));
    }
    let level = HeadingLevel::try_from(hashes).map_err(|_| invalid("more than six '#'"))?;
    Ok((Some(level), title))
}

fn headings(document: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut current: Option<Heading> = None;
    for (event, range) in Parser::new(document).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(Heading {
                    level,
                    title: String::new(),
                    range,
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = current.take() {
                    heading.title = heading.title.trim().to_string();
                    found.push(heading);
                }
            }
            _ => {}
        }
    }
    found
}

/// Offset just past the newline ending the line that contains `offset`.
fn line_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .find('\n')
        .map_or(text.len(), |i| offset + i + 1)
}

/// Offset of the first byte of the line containing `offset`.
fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}
