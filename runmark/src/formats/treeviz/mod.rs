//! Treeviz view of collected blocks (serialize only)
//!
//! A visual representation of what the collector made of a run sequence,
//! useful to see why a document rendered the way it did. Nesting is drawn with
//! box connectors, one node per line:
//!
//! <prefix><connector> <icon> <label> (labels truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ 4 blocks
//! ├─ § h1 Title
//! ├─ ¶ Some text
//! ├─ ☰ ordered, 2 items
//! │ ├─ • first
//! │ └─ • second
//! └─ " depth 1, 1 line
//!   └─ ↵ quoted
//!
//! With the `include-runs` extra parameter, every run is listed under its
//! block or line with its inline style.

use super::icons::get_icon;
use crate::common::collect::collect_blocks;
use crate::error::FormatError;
use crate::format::{bool_option, Format, FormatOptions};
use crate::model::{Block, RichText, Run};

const LABEL_WIDTH: usize = 30;

/// Format implementation for the block tree
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Collected blocks as a tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, runs: &RichText) -> Result<String, FormatError> {
        Ok(to_treeviz_str(&collect_blocks(runs), false))
    }

    fn serialize_with_options(
        &self,
        runs: &RichText,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        if let Some(key) = options.keys().find(|key| key.as_str() != "include-runs") {
            return Err(FormatError::NotSupported(format!(
                "Unknown treeviz parameter '{key}'"
            )));
        }
        let include_runs = bool_option(options, "include-runs")?.unwrap_or(false);
        Ok(to_treeviz_str(&collect_blocks(runs), include_runs))
    }
}

/// Render blocks as a tree.
pub fn to_treeviz_str(blocks: &[Block], include_runs: bool) -> String {
    let plural = if blocks.len() == 1 { "" } else { "s" };
    let mut output = format!("{} {} block{plural}\n", get_icon("document"), blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let is_last = index + 1 == blocks.len();
        format_block(&mut output, block, "", is_last, include_runs);
    }
    output
}

fn format_block(output: &mut String, block: &Block, prefix: &str, is_last: bool, include_runs: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    let icon = get_icon(block.kind_name());

    match block {
        Block::Heading { level, content } => {
            output.push_str(&format!("{prefix}{connector} {icon} h{level} {}\n", label(content)));
            if include_runs {
                format_runs(output, content, &child_prefix);
            }
        }
        Block::Paragraph { content } => {
            output.push_str(&format!("{prefix}{connector} {icon} {}\n", label(content)));
            if include_runs {
                format_runs(output, content, &child_prefix);
            }
        }
        Block::UnorderedList { items } | Block::OrderedList { items } => {
            let kind = if matches!(block, Block::OrderedList { .. }) {
                "ordered"
            } else {
                "unordered"
            };
            let count = counted(items.len(), "item");
            output.push_str(&format!("{prefix}{connector} {icon} {kind}, {count}\n"));
            format_children(output, items, "item", &child_prefix, include_runs);
        }
        Block::BlockQuote { depth, lines } => {
            let count = counted(lines.len(), "line");
            output.push_str(&format!("{prefix}{connector} {icon} depth {depth}, {count}\n"));
            format_children(output, lines, "line", &child_prefix, include_runs);
        }
        Block::CodeBlock { language, content } => {
            let language = language.as_deref().unwrap_or("plain");
            let count = counted(content.lines().count(), "line");
            output.push_str(&format!("{prefix}{connector} {icon} {language}, {count}\n"));
        }
        Block::Blank { count } => {
            let count = counted(*count, "newline");
            output.push_str(&format!("{prefix}{connector} {icon} {count}\n"));
        }
    }
}

fn format_children(
    output: &mut String,
    children: &[Vec<Run>],
    kind: &str,
    prefix: &str,
    include_runs: bool,
) {
    let icon = get_icon(kind);
    for (index, child) in children.iter().enumerate() {
        let is_last = index + 1 == children.len();
        let connector = if is_last { "└─" } else { "├─" };
        output.push_str(&format!("{prefix}{connector} {icon} {}\n", label(child)));
        if include_runs {
            let run_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
            format_runs(output, child, &run_prefix);
        }
    }
}

fn format_runs(output: &mut String, runs: &[Run], prefix: &str) {
    let icon = get_icon("run");
    for (index, run) in runs.iter().enumerate() {
        let connector = if index + 1 == runs.len() { "└─" } else { "├─" };
        output.push_str(&format!(
            "{prefix}{connector} {icon} {:?} {}\n",
            run.text,
            style_flags(run)
        ));
    }
}

/// Compact description of a run's inline style, e.g. `[bold italic]`.
pub fn style_flags(run: &Run) -> String {
    let style = run.effective_style();
    let mut flags = Vec::new();
    if style.bold {
        flags.push("bold".to_string());
    }
    if style.italic {
        flags.push("italic".to_string());
    }
    if style.strike {
        flags.push("strike".to_string());
    }
    if style.code {
        flags.push("code".to_string());
    }
    if let Some(link) = style.link {
        flags.push(format!("link={link}"));
    }
    format!("[{}]", flags.join(" "))
}

fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn label(runs: &[Run]) -> String {
    let text: String = runs
        .iter()
        .map(|run| run.text.as_str())
        .collect::<String>()
        .trim_matches('\n')
        .replace('\n', "⏎");
    if text.chars().count() > LABEL_WIDTH {
        let truncated: String = text.chars().take(LABEL_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        text
    }
}
