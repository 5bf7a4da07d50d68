//! Markdown escaping and fence sizing.
//!
//! Escaping is a single left-to-right pass, so an already escaped sequence is
//! never escaped twice: `\*` in the text becomes `\\\*`, which re-parses to the
//! same two characters.

/// Characters escaped wherever they appear in plain text.
const ALWAYS_ESCAPED: &[char] = &['\\', '*', '_', '[', ']', '(', ')', '`', '~'];

/// Whether a `<` followed by `next` could open an HTML tag or an autolink.
fn opens_tag(next: Option<&char>) -> bool {
    next.map_or(false, |c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Escape plain text for use inside a Markdown block.
///
/// A `<` is escaped only where it could open an HTML tag or an autolink
/// (`<div>`, `</p>`, `<!--`, `<https://..>`), so `a < b` stays as written.
///
/// `line_start` tells whether the text begins a line of output. With
/// `escape_line_starts` set, characters that would open a block at the start
/// of a line (`#`, `>`, `-`, `+`, `=`, and the `.` of `1.`) are escaped there
/// too.
pub fn escape_text(text: &str, line_start: bool, escape_line_starts: bool) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();
    let mut at_line_start = line_start;
    // Inside a leading digit sequence
    let mut in_ordinal = false;

    while let Some(c) = chars.next() {
        let block_marker = escape_line_starts && at_line_start;
        if ALWAYS_ESCAPED.contains(&c) || (c == '<' && opens_tag(chars.peek())) {
            result.push('\\');
            result.push(c);
        } else if block_marker && matches!(c, '#' | '>' | '-' | '+' | '=') {
            result.push('\\');
            result.push(c);
        } else if escape_line_starts
            && in_ordinal
            && c == '.'
            && chars.peek().map_or(true, |next| *next == ' ')
        {
            result.push_str("\\.");
        } else {
            result.push(c);
        }

        in_ordinal = c.is_ascii_digit() && (block_marker || in_ordinal);
        at_line_start = c == '\n';
    }

    result
}

/// Length of the longest run of `fence_char` in `content`.
pub fn longest_run(content: &str, fence_char: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == fence_char {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}

/// Backtick fence length for a fenced code block: at least three, and longer
/// than any backtick run in the content.
pub fn code_fence_length(content: &str) -> usize {
    (longest_run(content, '`') + 1).max(3)
}

/// Render `content` as an inline code span.
///
/// The fence is one backtick longer than the longest internal backtick run.
/// Content that starts or ends with a backtick, or is wrapped in spaces on
/// both sides, is padded with one space so the parser strips it back off.
pub fn code_span(content: &str) -> String {
    let fence = "`".repeat(longest_run(content, '`') + 1);
    let wrapped_in_spaces = content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && !content.chars().all(|c| c == ' ');
    let pad = content.starts_with('`') || content.ends_with('`') || wrapped_in_spaces;

    if pad {
        format!("{fence} {content} {fence}")
    } else {
        format!("{fence}{content}{fence}")
    }
}
