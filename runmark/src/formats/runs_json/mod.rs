//! Run sequences as JSON
//!
//! The exchange format for editing surfaces: an array of runs, each with its
//! text, its attributes (unset attributes omitted) and optional native traits.
//!
//! ```json
//! [
//!   { "text": "Title", "attributes": { "heading_level": 1 } },
//!   { "text": "Some ", "attributes": { "paragraph_id": 0 } },
//!   { "text": "bold", "attributes": { "bold": true, "paragraph_id": 0 } }
//! ]
//! ```
//!
//! Decoding re-applies the attribute invariants (code clears other inline
//! flags, heading levels are clamped) so hand-written input cannot produce a
//! run the rest of the pipeline does not expect.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::{Attributes, ListMarker, RichText, Run};

/// Format implementation for JSON run sequences
pub struct RunsJsonFormat;

impl Format for RunsJsonFormat {
    fn name(&self) -> &str {
        "runs-json"
    }

    fn description(&self) -> &str {
        "Run sequence as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<RichText, FormatError> {
        let runs: Vec<Run> = serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("Invalid run JSON: {e}")))?;
        Ok(RichText::from_runs(runs.into_iter().map(sanitize).collect()))
    }

    fn serialize(&self, runs: &RichText) -> Result<String, FormatError> {
        serde_json::to_string_pretty(runs)
            .map_err(|e| FormatError::SerializationError(format!("JSON encoding failed: {e}")))
    }
}

/// Rebuild the attribute set through its constructors.
fn sanitize(run: Run) -> Run {
    let raw = run.attributes;
    let mut attributes = Attributes::plain();
    if raw.bold {
        attributes = attributes.with_bold();
    }
    if raw.italic {
        attributes = attributes.with_italic();
    }
    if raw.strike {
        attributes = attributes.with_strike();
    }
    if raw.link.is_some() {
        attributes = attributes.with_link(raw.link);
    }
    if raw.code {
        attributes = attributes.with_code();
    }
    if let Some(level) = raw.heading_level {
        attributes = attributes.with_heading_level(level);
    }
    if let Some(marker) = raw.list_item {
        attributes = attributes.with_list_item(ListMarker::new(marker.kind, marker.ordinal));
    }
    if let Some(depth) = raw.quote_depth {
        attributes = attributes.with_quote_depth(depth);
    }
    if let Some(info) = raw.code_block {
        attributes = attributes.with_code_block(info);
    }
    if let Some(id) = raw.paragraph_id {
        attributes = attributes.with_paragraph_id(id);
    }
    Run {
        text: run.text,
        attributes,
        native: run.native,
    }
}
