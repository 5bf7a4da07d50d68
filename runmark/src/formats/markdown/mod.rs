//! Markdown format implementation
//!
//! This module implements bidirectional conversion between a run sequence and
//! CommonMark Markdown (with the strikethrough extension).
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing. Serialization is done by
//! hand from the collected blocks: the output has to be canonical and stable
//! across round trips, which means full control over separators, escaping and
//! fence sizing.
//!
//! # Element Mapping Table
//!
//! | Markdown Element      | Run Attributes                   | Export Notes                          | Import Notes                          |
//! |-----------------------|----------------------------------|---------------------------------------|---------------------------------------|
//! | Heading (# .. ######) | `heading_level`                  | `#` × level                           | Level clamped to 1..=6                |
//! | Paragraph             | `paragraph_id`                   | Separated by one blank line           | One id per paragraph, sequential      |
//! | List (- / 1.)         | `list_item` (kind, ordinal)      | Renumbered from 1, always tight       | Ordinal re-derived from item order    |
//! | Block quote (>)       | `quote_depth`                    | `> ` × depth per line                 | Depth repaired from source lines      |
//! | Code block (```)      | `code_block` (language, content) | Fence longer than any backtick run    | One run per block                     |
//! | InlineContent:        |                                  |                                       |                                       |
//! |   Strong              | `bold`                           | `**`                                  | `**` and `__`                         |
//! |   Emphasis            | `italic`                         | `*`                                   | `*` and `_`                           |
//! |   Strikethrough       | `strike`                         | `~~`                                  | `~~` and `~`                          |
//! |   Code                | `code`                           | Minimal backtick fence                | Clears every other inline flag        |
//! |   Link                | `link`                           | Destination escaped                   | Invalid destinations dropped          |
//!
//! # Lossy Conversions
//!
//! The following conversions do not survive a round trip byte for byte:
//! - `_`/`__` emphasis → `*`/`**`
//! - Tilde and indented code blocks → backtick fences
//! - Loose lists → tight lists
//! - Hard line breaks → soft breaks
//! - Paragraphs inside one quote separated by a blank line → one quote with a bare `>` line
//! - Three or more consecutive newlines → two (configurable)
//! - Emphasis or links around inline code → plain code span
//! - Inline HTML → literal text with the opening `<` escaped
//!
//! # Extra Parameters
//!
//! - `repair-quote-depth` (parse): run the quote-depth repair, default true
//! - `max-consecutive-newlines` (serialize): newline cap, `0` disables it
//! - `escape-line-starts` (serialize): escape block markers at line starts

pub mod escape;
pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{bool_option, usize_option, Format, FormatOptions};
use crate::model::RichText;
use parser::ParseOptions;
use serializer::RenderOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl MarkdownFormat {
    pub fn new(parse_options: ParseOptions, render_options: RenderOptions) -> Self {
        MarkdownFormat {
            parse_options,
            render_options,
        }
    }

    fn parse_options_with(&self, options: &FormatOptions) -> Result<ParseOptions, FormatError> {
        let mut parse_options = self.parse_options.clone();
        for key in options.keys() {
            match key.as_str() {
                "repair-quote-depth" => {}
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Unknown markdown parse parameter '{other}'"
                    )))
                }
            }
        }
        if let Some(repair) = bool_option(options, "repair-quote-depth")? {
            parse_options.repair_quote_depth = repair;
        }
        Ok(parse_options)
    }

    fn render_options_with(&self, options: &FormatOptions) -> Result<RenderOptions, FormatError> {
        let mut render_options = self.render_options.clone();
        for key in options.keys() {
            match key.as_str() {
                "max-consecutive-newlines" | "escape-line-starts" => {}
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Unknown markdown serialize parameter '{other}'"
                    )))
                }
            }
        }
        if let Some(max) = usize_option(options, "max-consecutive-newlines")? {
            render_options.max_consecutive_newlines = max;
        }
        if let Some(escape) = bool_option(options, "escape-line-starts")? {
            render_options.escape_line_starts = escape;
        }
        Ok(render_options)
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with strikethrough"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<RichText, FormatError> {
        Ok(parser::parse_from_markdown_with_options(
            source,
            &self.parse_options,
        ))
    }

    fn serialize(&self, runs: &RichText) -> Result<String, FormatError> {
        Ok(serializer::serialize_to_markdown_with_options(
            runs,
            &self.render_options,
        ))
    }

    fn parse_with_options(
        &self,
        source: &str,
        options: &FormatOptions,
    ) -> Result<RichText, FormatError> {
        let parse_options = self.parse_options_with(options)?;
        Ok(parser::parse_from_markdown_with_options(
            source,
            &parse_options,
        ))
    }

    fn serialize_with_options(
        &self,
        runs: &RichText,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        let render_options = self.render_options_with(options)?;
        Ok(serializer::serialize_to_markdown_with_options(
            runs,
            &render_options,
        ))
    }
}
