//! Pipeline shortcuts
//!
//! Functional entry points over the Markdown format, for callers that do not
//! need the registry: parse, render, round trip, and the display path.

use crate::common::blank_lines::{restore_blank_lines, DisplayRun};
use crate::formats::markdown::parser::{parse_from_markdown_with_options, ParseOptions};
use crate::formats::markdown::serializer::{serialize_to_markdown_with_options, RenderOptions};
use crate::model::RichText;

/// Parse Markdown into runs with default options.
///
/// # Example
///
/// ```
/// use runmark::transforms::markdown_to_runs;
///
/// let runs = markdown_to_runs("Hello *world*\n");
/// assert_eq!(runs.plain_text(), "Hello world\n");
/// ```
pub fn markdown_to_runs(source: &str) -> RichText {
    parse_from_markdown_with_options(source, &ParseOptions::default())
}

/// Render runs as Markdown with default options.
pub fn runs_to_markdown(runs: &RichText) -> String {
    serialize_to_markdown_with_options(runs, &RenderOptions::default())
}

/// Round-trip transformation: parse and re-render
///
/// Canonical Markdown comes back unchanged; anything else comes back in
/// canonical form, which is a fixed point of this function.
///
/// # Example
///
/// ```
/// use runmark::transforms::format_markdown_source;
///
/// assert_eq!(format_markdown_source("3. third\n4. fourth\n"), "1. third\n2. fourth\n");
/// ```
pub fn format_markdown_source(source: &str) -> String {
    format_markdown_source_with(source, &ParseOptions::default(), &RenderOptions::default())
}

/// Round trip with explicit options.
pub fn format_markdown_source_with(
    source: &str,
    parse_options: &ParseOptions,
    render_options: &RenderOptions,
) -> String {
    let runs = parse_from_markdown_with_options(source, parse_options);
    serialize_to_markdown_with_options(&runs, render_options)
}

/// Parse Markdown for display: runs with the source's blank lines restored
/// and presentation flags lifted.
pub fn markdown_to_display_runs(source: &str, parse_options: &ParseOptions) -> Vec<DisplayRun> {
    let runs = parse_from_markdown_with_options(source, parse_options);
    restore_blank_lines(&runs, source)
}
