//! Display runs as JSON (serialize only)
//!
//! The display path is what a rich-text surface shows: runs with source
//! spacing restored and a schema-free [`Presentation`] per run. It is not a
//! round-trip target, so this format cannot parse.
//!
//! The spacing source is the Markdown rendering of the run sequence. Callers
//! that still hold the original Markdown should use
//! [`crate::common::blank_lines::restore_blank_lines`] with it instead.
//!
//! [`Presentation`]: crate::common::blank_lines::Presentation

use crate::common::blank_lines::{restore_blank_lines, DisplayRun};
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::markdown::serializer::{serialize_to_markdown_with_options, RenderOptions};
use crate::model::RichText;

/// Format implementation for display runs
#[derive(Debug, Clone, Default)]
pub struct DisplayJsonFormat {
    render_options: RenderOptions,
}

impl DisplayJsonFormat {
    pub fn new(render_options: RenderOptions) -> Self {
        DisplayJsonFormat { render_options }
    }
}

impl Format for DisplayJsonFormat {
    fn name(&self) -> &str {
        "display-json"
    }

    fn description(&self) -> &str {
        "Display runs with restored spacing, as JSON"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, runs: &RichText) -> Result<String, FormatError> {
        let source = serialize_to_markdown_with_options(runs, &self.render_options);
        display_runs_to_json(&restore_blank_lines(runs, &source))
    }
}

/// Encode display runs as pretty-printed JSON.
pub fn display_runs_to_json(runs: &[DisplayRun]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(runs)
        .map_err(|e| FormatError::SerializationError(format!("JSON encoding failed: {e}")))
}
