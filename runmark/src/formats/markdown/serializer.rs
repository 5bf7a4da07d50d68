//! Markdown serialization (runs → Markdown)
//!
//! Pipeline: run sequence → blocks (see `common::collect`) → Markdown string
//!
//! Blocks are rendered one after the other and only the renderer decides how
//! they are separated, so blank lines are never doubled. Inline content is
//! grouped by link first, then by `(bold, strike)`, and italic is applied
//! inside the innermost group. That keeps `[go **now**](u)` one link and
//! `**a *b* c**` one bold wrapper around the italic span.

use super::escape::{code_fence_length, code_span, escape_text};
use crate::common::collect::collect_blocks;
use crate::common::links::escape_destination;
use crate::model::{Block, InlineStyle, RichText, Run, MAX_HEADING_LEVEL};

/// Knobs for the runs → Markdown direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Upper bound on consecutive newlines anywhere outside code blocks.
    /// Zero disables the limit.
    pub max_consecutive_newlines: usize,
    /// Escape characters that would open a block at the start of a line.
    pub escape_line_starts: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            max_consecutive_newlines: 2,
            escape_line_starts: true,
        }
    }
}

/// Serialize a run sequence to Markdown with default options.
pub fn serialize_to_markdown(runs: &RichText) -> String {
    serialize_to_markdown_with_options(runs, &RenderOptions::default())
}

/// Serialize a run sequence to Markdown.
pub fn serialize_to_markdown_with_options(runs: &RichText, options: &RenderOptions) -> String {
    let blocks = collect_blocks(runs);
    let mut markdown = render_blocks(&blocks, options);

    let content_len = markdown.trim_end_matches('\n').len();
    markdown.truncate(content_len);
    if runs.ends_with_newline() {
        markdown.push('\n');
    }
    markdown
}

/// Render blocks without normalizing the end of the document.
pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> String {
    let mut writer = NewlineLimiter::new(options.max_consecutive_newlines);

    for (index, block) in blocks.iter().enumerate() {
        let next = blocks.get(index + 1);
        match block {
            Block::Heading { level, content } => {
                // Levels from outside the parser may exceed the Markdown range
                let level = (*level).clamp(1, MAX_HEADING_LEVEL);
                writer.push_str(&"#".repeat(usize::from(level)));
                writer.push_str(" ");
                writer.push_str(render_inline(content, options).trim_matches('\n'));
                writer.push_str("\n\n");
            }

            Block::UnorderedList { items } | Block::OrderedList { items } => {
                let ordered = matches!(block, Block::OrderedList { .. });
                for (position, item) in items.iter().enumerate() {
                    if ordered {
                        writer.push_str(&format!("{}. ", position + 1));
                    } else {
                        writer.push_str("- ");
                    }
                    writer.push_str(render_inline(item, options).trim_matches('\n'));
                    writer.push_str("\n");
                }
                if next.is_some() {
                    writer.push_str("\n");
                }
            }

            Block::BlockQuote { depth, lines } => {
                let marker = "> ".repeat(*depth);
                for line in lines {
                    if line.is_empty() {
                        writer.push_str(marker.trim_end());
                    } else {
                        writer.push_str(&marker);
                        writer.push_str(&render_inline(line, options));
                    }
                    writer.push_str("\n");
                }
                if next.is_some_and(|block| !block.is_quote()) {
                    writer.push_str("\n");
                }
            }

            Block::CodeBlock { language, content } => {
                let fence = "`".repeat(code_fence_length(content));
                writer.push_str(&fence);
                if let Some(language) = language {
                    writer.push_str(language);
                }
                writer.push_str("\n");
                if !content.is_empty() {
                    writer.push_verbatim(content);
                    if !content.ends_with('\n') {
                        writer.push_verbatim("\n");
                    }
                }
                writer.push_str(&fence);
                writer.push_str("\n");
                if next.is_some() {
                    writer.push_str("\n");
                }
            }

            Block::Paragraph { content } => {
                writer.push_str(&render_inline(content, options));
                if next.is_some_and(|block| !block.is_blank()) {
                    writer.push_str("\n\n");
                }
            }

            Block::Blank { count } => writer.push_str(&"\n".repeat(*count)),
        }
    }

    writer.finish()
}

/// Render the inline content of one block.
pub fn render_inline(runs: &[Run], options: &RenderOptions) -> String {
    let styled: Vec<(InlineStyle, &str)> = runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| (run.effective_style(), run.text.as_str()))
        .collect();

    let mut out = String::new();
    let mut start = 0;
    while start < styled.len() {
        let (style, text) = &styled[start];
        if style.code {
            out.push_str(&code_span(text));
            start += 1;
            continue;
        }

        let end = stretch_end(&styled, start, |other| other.link == style.link);
        let line_start = out.is_empty() || out.ends_with('\n');
        out.push_str(&render_link(&styled[start..end], line_start, options));
        start = end;
    }
    out
}

/// End of the stretch of non-code runs from `start` that satisfy `same`.
fn stretch_end(
    styled: &[(InlineStyle, &str)],
    start: usize,
    same: impl Fn(&InlineStyle) -> bool,
) -> usize {
    styled[start..]
        .iter()
        .position(|(other, _)| other.code || !same(other))
        .map_or(styled.len(), |offset| start + offset)
}

/// Render runs sharing one link destination, or none.
fn render_link(group: &[(InlineStyle, &str)], line_start: bool, options: &RenderOptions) -> String {
    let mut inner = String::new();
    let mut at_line_start = line_start;
    let mut start = 0;
    while start < group.len() {
        let key = group[start].0.emphasis_key();
        let end = stretch_end(group, start, |other| other.emphasis_key() == key);
        inner.push_str(&render_emphasis(&group[start..end], &mut at_line_start, options));
        start = end;
    }

    match group.first().and_then(|(style, _)| style.link.as_deref()) {
        Some(destination) if !inner.is_empty() => {
            format!("[{inner}]({})", escape_destination(destination))
        }
        _ => inner,
    }
}

/// Render runs sharing one `(bold, strike)` key.
fn render_emphasis(
    group: &[(InlineStyle, &str)],
    at_line_start: &mut bool,
    options: &RenderOptions,
) -> String {
    let mut inner = String::new();
    let mut index = 0;

    while index < group.len() {
        let italic = group[index].0.italic;
        let mut text = String::new();
        while index < group.len() && group[index].0.italic == italic {
            let escaped = escape_text(group[index].1, *at_line_start, options.escape_line_starts);
            if !escaped.is_empty() {
                *at_line_start = escaped.ends_with('\n');
            }
            text.push_str(&escaped);
            index += 1;
        }
        if italic {
            inner.push_str(&wrap(&text, "*"));
        } else {
            inner.push_str(&text);
        }
    }

    let Some((style, _)) = group.first() else {
        return inner;
    };
    if style.bold {
        inner = wrap(&inner, "**");
    }
    if style.strike {
        inner = wrap(&inner, "~~");
    }
    inner
}

/// Wrap `text` in `delimiter`, keeping surrounding whitespace outside.
fn wrap(text: &str, delimiter: &str) -> String {
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];
    format!("{leading}{delimiter}{core}{delimiter}{trailing}")
}

/// Output buffer that caps runs of consecutive newlines.
///
/// Text written with [`NewlineLimiter::push_verbatim`] bypasses the cap.
struct NewlineLimiter {
    out: String,
    max: usize,
    newlines: usize,
}

impl NewlineLimiter {
    fn new(max: usize) -> Self {
        NewlineLimiter {
            out: String::new(),
            max,
            newlines: 0,
        }
    }

    fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.newlines += 1;
                if self.max > 0 && self.newlines > self.max {
                    continue;
                }
            } else {
                self.newlines = 0;
            }
            self.out.push(c);
        }
    }

    fn push_verbatim(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.out.push_str(text);
        let trailing = text.len() - text.trim_end_matches('\n').len();
        self.newlines = if trailing == text.len() {
            self.newlines + trailing
        } else {
            trailing
        };
    }

    fn finish(self) -> String {
        self.out
    }
}
