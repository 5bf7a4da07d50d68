//! CLI-specific transforms
//!
//! This module defines all the transform combinations available in the CLI.
//! Each transform is a stage + format combination (e.g., "runs-json", "blocks-tree").
//!
//! ## Transform Pipeline
//!
//! Markdown goes through these stages on its way back to Markdown:
//!
//! 1. **Parsing** - Markdown → runs
//!    - `runs-raw-json`: Runs straight from the AST walk (no quote-depth repair)
//!    - `runs-json`: Final runs
//!    - `runs-table`: Final runs, one line each
//!
//! 2. **Collection** - Runs → blocks
//!    - `blocks-json`: JSON representation
//!    - `blocks-tree`: Tree visualization with Unicode icons
//!
//! 3. **Rendering** - Blocks → Markdown / display
//!    - `markdown`: Round-trip output
//!    - `display-json`: Display runs with restored blank lines
//!
//! ## Extra Parameters
//!
//! Transforms can accept extra parameters via `--extra-<name> [value]`:
//!
//! - `include-runs`: list the runs under every node of `blocks-tree`
//! - `repair-quote-depth`: turn the quote-depth repair off with "false"
//! - `max-consecutive-newlines`, `escape-line-starts`: rendering knobs
//!
//! Example: `runmark inspect doc.md blocks-tree --extra-include-runs`

use runmark::common::collect::collect_blocks;
use runmark::format::{bool_option, usize_option};
use runmark::formats::display::display_runs_to_json;
use runmark::formats::markdown::parser::{parse_from_markdown_with_options, parse_raw};
use runmark::formats::treeviz::{style_flags, to_treeviz_str};
use runmark::model::{ListKind, Run};
use runmark::transforms::{format_markdown_source_with, markdown_to_display_runs};
use runmark::{ParseOptions, RenderOptions};
use std::collections::HashMap;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "runs-json",
    "runs-raw-json",
    "runs-table",
    "blocks-json",
    "blocks-tree",
    "display-json",
    "markdown",
];

/// Execute a named transform on a source file with optional extra parameters
///
/// # Arguments
///
/// * `source` - The Markdown source to transform
/// * `transform_name` - The transform to apply (e.g., "blocks-tree", "runs-json")
/// * `extra_params` - Optional parameters for the transform
///
/// # Returns
///
/// The transformed output as a string, or an error message
///
/// # Examples
///
/// ```ignore
/// let source = "# Title\n\nBody\n";
/// let params = HashMap::new();
///
/// // Get block tree visualization (default view)
/// let output = execute_transform(source, "blocks-tree", &params)?;
///
/// // Include the runs of every block
/// let mut run_params = HashMap::new();
/// run_params.insert("include-runs".to_string(), "true".to_string());
/// let output = execute_transform(source, "blocks-tree", &run_params)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let parse_options = parse_options_from(extra_params)?;

    match transform_name {
        "runs-json" => {
            let runs = parse_from_markdown_with_options(source, &parse_options);
            serde_json::to_string_pretty(&runs)
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "runs-raw-json" => serde_json::to_string_pretty(&parse_raw(source))
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "runs-table" => {
            let runs = parse_from_markdown_with_options(source, &parse_options);
            Ok(runs_to_table(&runs.runs))
        }
        "blocks-json" => {
            let runs = parse_from_markdown_with_options(source, &parse_options);
            serde_json::to_string_pretty(&collect_blocks(&runs))
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "blocks-tree" => {
            let include_runs = bool_option(extra_params, "include-runs")
                .map_err(|e| e.to_string())?
                .unwrap_or(false);
            let runs = parse_from_markdown_with_options(source, &parse_options);
            Ok(to_treeviz_str(&collect_blocks(&runs), include_runs))
        }
        "display-json" => {
            let display = markdown_to_display_runs(source, &parse_options);
            display_runs_to_json(&display).map_err(|e| e.to_string())
        }
        "markdown" => {
            let render_options = render_options_from(extra_params)?;
            Ok(format_markdown_source_with(
                source,
                &parse_options,
                &render_options,
            ))
        }
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

fn parse_options_from(params: &HashMap<String, String>) -> Result<ParseOptions, String> {
    let mut options = ParseOptions::default();
    if let Some(repair) = bool_option(params, "repair-quote-depth").map_err(|e| e.to_string())? {
        options.repair_quote_depth = repair;
    }
    Ok(options)
}

fn render_options_from(params: &HashMap<String, String>) -> Result<RenderOptions, String> {
    let mut options = RenderOptions::default();
    if let Some(max) =
        usize_option(params, "max-consecutive-newlines").map_err(|e| e.to_string())?
    {
        options.max_consecutive_newlines = max;
    }
    if let Some(escape) = bool_option(params, "escape-line-starts").map_err(|e| e.to_string())? {
        options.escape_line_starts = escape;
    }
    Ok(options)
}

/// One line per run: index, quoted text, inline style, block tags.
fn runs_to_table(runs: &[Run]) -> String {
    let mut output = String::new();
    for (index, run) in runs.iter().enumerate() {
        let mut line = format!("{index:>3}  {:?}  {}", run.text, style_flags(run));
        for tag in block_tags(run) {
            line.push(' ');
            line.push_str(&tag);
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

fn block_tags(run: &Run) -> Vec<String> {
    let attrs = &run.attributes;
    let mut tags = Vec::new();
    if let Some(level) = attrs.heading_level {
        tags.push(format!("heading={level}"));
    }
    if let Some(marker) = attrs.list_item {
        let kind = match marker.kind {
            ListKind::Ordered => "ordered",
            ListKind::Unordered => "unordered",
        };
        tags.push(format!("list={kind}:{}", marker.ordinal));
    }
    if let Some(depth) = attrs.quote_depth {
        tags.push(format!("quote={depth}"));
    }
    if let Some(info) = &attrs.code_block {
        match &info.language {
            Some(language) => tags.push(format!("code-block={language}")),
            None => tags.push("code-block".to_string()),
        }
    }
    if let Some(id) = attrs.paragraph_id {
        tags.push(format!("paragraph={id}"));
    }
    tags
}
