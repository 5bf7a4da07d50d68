//! Repairs block-quote nesting transitions lost by the Markdown parser.
//!
//! # The Problem
//!
//! CommonMark lets a shallower quote line continue a deeper paragraph
//! ("lazy continuation"), so
//!
//! ```text
//! > A
//! > > B
//! > C
//! ```
//!
//! parses as depth 1 (`A`) and depth 2 (`B C`). The source clearly says the
//! depths are 1, 2, 1, and the serializer must reproduce that.
//!
//! # The Algorithm
//!
//! 1. **Fast exit:** no `>` anywhere in the source means nothing to repair.
//!
//! 2. **Re-scan:** every source line is stripped of its leading quote markers
//!    (`>` optionally followed by one space), which yields its depth and its
//!    visible content. Lazy continuation lines inherit the previous depth.
//!
//! 3. **Regions:** consecutive quoted lines (blank lines in between allowed)
//!    form a region. Each region is paired, in order, with a maximal span of
//!    quote-tagged runs. A region needs repair only when, inside a stretch of
//!    quoted lines, a depth drops below a depth reached earlier.
//!
//! 4. **Validate:** the visible character count of the region must equal the
//!    non-newline character count of its run span.
//!    - Mismatch with an undecorated span: rebuild the span from the lines.
//!    - Mismatch with decoration: abort, the styling is worth more than the
//!      nesting.
//!
//! 5. **Re-slice:** walk the span's runs with an explicit (run, char) cursor,
//!    cut each line's worth of characters out of them, and re-tag every piece
//!    with the depth of its line. Line breaks are re-derived from the source:
//!    a blank `>` line becomes a separator newline carrying the depth of the
//!    line after it, an unquoted blank line a plain blank line.
//!
//! Any situation the pass cannot handle safely returns the input untouched.

use crate::model::{Attributes, RichText, Run};
use std::ops::Range;

/// A source line after quote markers were stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceLine<'a> {
    depth: usize,
    content: &'a str,
}

impl SourceLine<'_> {
    fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    fn visible_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Reasons the pass declines to change its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Abort {
    RegionSpanMismatch { regions: usize, spans: usize },
    DecoratedLengthMismatch { visible: usize, runs: usize },
    SliceExhausted,
    SliceTextMismatch,
    SliceLeftover,
}

/// Repair quote depths in `runs` using `source` as the reference.
pub fn repair_quote_depth(runs: RichText, source: &str) -> RichText {
    if !source.contains('>') {
        return runs;
    }

    match try_repair(&runs, source) {
        Ok(Some(repaired)) => repaired,
        Ok(None) => runs,
        Err(reason) => {
            tracing::debug!(?reason, "quote-depth repair aborted, keeping parser output");
            runs
        }
    }
}

fn try_repair(runs: &RichText, source: &str) -> Result<Option<RichText>, Abort> {
    let lines = scan_lines(source);
    if lines.iter().all(|line| line.depth == 0) {
        return Ok(None);
    }

    let regions = quote_regions(&lines);
    if !regions.iter().any(|region| needs_repair(&lines[region.clone()])) {
        return Ok(None);
    }

    let spans = quote_spans(&runs.runs);
    if spans.len() != regions.len() {
        return Err(Abort::RegionSpanMismatch {
            regions: regions.len(),
            spans: spans.len(),
        });
    }

    let mut output = RichText::new();
    let mut cursor = 0;
    for (region, span) in regions.iter().zip(spans.iter()) {
        for run in &runs.runs[cursor..span.start] {
            output.push(run.clone());
        }

        let region_lines = &lines[region.clone()];
        let span_runs = &runs.runs[span.clone()];
        if needs_repair(region_lines) {
            for run in repair_span(span_runs, region_lines)? {
                output.push(run);
            }
        } else {
            for run in span_runs {
                output.push(run.clone());
            }
        }
        cursor = span.end;
    }
    for run in &runs.runs[cursor..] {
        output.push(run.clone());
    }

    Ok(Some(output))
}

fn repair_span(span: &[Run], lines: &[SourceLine<'_>]) -> Result<Vec<Run>, Abort> {
    let visible: usize = lines.iter().map(SourceLine::visible_len).sum();
    let available: usize = span
        .iter()
        .map(|run| run.text.chars().filter(|&c| c != '\n').count())
        .sum();

    if visible == available {
        return reslice(span, lines);
    }

    let decorated = span
        .iter()
        .any(|run| run.has_inline_decoration() || has_foreign_block_tag(&run.attributes));
    if decorated {
        return Err(Abort::DecoratedLengthMismatch {
            visible,
            runs: available,
        });
    }

    tracing::debug!(visible, runs = available, "rebuilding quote region from source lines");
    Ok(rebuild(lines))
}

fn has_foreign_block_tag(attributes: &Attributes) -> bool {
    attributes.heading_level.is_some()
        || attributes.list_item.is_some()
        || attributes.code_block.is_some()
}

/// Plain runs straight from the re-scanned lines.
fn rebuild(lines: &[SourceLine<'_>]) -> Vec<Run> {
    let mut out = Vec::new();
    for (breaks, line) in content_lines(lines) {
        out.extend(breaks);
        out.push(Run::new(
            line.content,
            Attributes::plain().with_quote_depth(line.depth),
        ));
    }
    out
}

/// The non-blank lines of a region, each with the runs separating it from
/// the previous non-blank line.
///
/// Adjacent lines are separated by one plain newline. Blank lines that are
/// all quoted add a newline tagged with the next line's depth, which the
/// collector turns into a bare `>` line. Any unquoted blank line in between
/// makes the separator a real blank line.
fn content_lines<'l, 'a>(lines: &'l [SourceLine<'a>]) -> Vec<(Vec<Run>, &'l SourceLine<'a>)> {
    let mut out = Vec::new();
    // Set after a blank line: whether every blank line since the last
    // content line was quoted
    let mut gap: Option<bool> = None;

    for line in lines {
        if line.is_blank() {
            if !out.is_empty() {
                gap = Some(gap.unwrap_or(true) && line.depth > 0);
            }
            continue;
        }

        let breaks = match (out.is_empty(), gap.take()) {
            (true, _) => Vec::new(),
            (false, None) => vec![Run::newline()],
            (false, Some(true)) => vec![
                Run::newline(),
                Run::new("\n", Attributes::plain().with_quote_depth(line.depth)),
            ],
            (false, Some(false)) => vec![Run::plain("\n\n")],
        };
        out.push((breaks, line));
    }
    out
}

/// Cursor into an arena of runs, addressed by run index and char offset.
struct SliceCursor<'r> {
    runs: &'r [Run],
    chars: Vec<Vec<char>>,
    run: usize,
    offset: usize,
}

impl<'r> SliceCursor<'r> {
    fn new(runs: &'r [Run]) -> Self {
        SliceCursor {
            runs,
            chars: runs.iter().map(|run| run.text.chars().collect()).collect(),
            run: 0,
            offset: 0,
        }
    }

    /// Step over line breaks and exhausted runs.
    fn skip_breaks(&mut self) {
        while let Some(chars) = self.chars.get(self.run) {
            if self.offset >= chars.len() {
                self.run += 1;
                self.offset = 0;
            } else if chars[self.offset] == '\n' {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Take up to `wanted` visible chars from the current run, never crossing
    /// a line break.
    fn take(&mut self, wanted: usize) -> Option<(&'r Run, String)> {
        self.skip_breaks();
        let run = self.runs.get(self.run)?;
        let piece: String = self.chars[self.run][self.offset..]
            .iter()
            .take_while(|&&c| c != '\n')
            .take(wanted)
            .collect();
        self.offset += piece.chars().count();
        Some((run, piece))
    }

    fn only_breaks_left(&mut self) -> bool {
        self.skip_breaks();
        self.run >= self.runs.len()
    }
}

fn reslice(span: &[Run], lines: &[SourceLine<'_>]) -> Result<Vec<Run>, Abort> {
    let mut cursor = SliceCursor::new(span);
    let mut out = Vec::new();

    for (breaks, line) in content_lines(lines) {
        out.extend(breaks);

        let mut needed = line.visible_len();
        let mut collected = String::new();
        while needed > 0 {
            let (source_run, piece) = cursor.take(needed).ok_or(Abort::SliceExhausted)?;
            needed -= piece.chars().count();
            collected.push_str(&piece);

            let mut sliced = Run::new(piece, source_run.attributes.with_quote_depth(line.depth));
            sliced.native = source_run.native.clone();
            out.push(sliced);
        }

        if collected != line.content {
            return Err(Abort::SliceTextMismatch);
        }
    }

    if !cursor.only_breaks_left() {
        return Err(Abort::SliceLeftover);
    }
    Ok(out)
}

/// Strip quote markers from every line.
fn scan_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines: Vec<SourceLine<'_>> = Vec::new();
    let mut previous_open = false;

    for raw in source.lines() {
        let (mut depth, content) = strip_quote_markers(raw);

        // A lazy continuation line belongs to the paragraph left open above it
        if depth == 0 && previous_open && !content.is_empty() && !starts_block(content) {
            depth = lines.last().map_or(0, |line| line.depth);
        }

        previous_open = depth > 0 && !content.is_empty();
        lines.push(SourceLine { depth, content });
    }
    lines
}

fn strip_quote_markers(line: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = line;
    loop {
        let indented = rest.trim_start_matches(' ');
        if rest.len() - indented.len() > 3 {
            break;
        }
        match indented.strip_prefix('>') {
            Some(after) => {
                depth += 1;
                rest = after.strip_prefix(' ').unwrap_or(after);
            }
            None => break,
        }
    }
    (depth, rest.trim())
}

fn starts_block(content: &str) -> bool {
    if content.starts_with('#') || content.starts_with("```") || content.starts_with("~~~") {
        return true;
    }
    if ["- ", "* ", "+ "].iter().any(|marker| content.starts_with(marker)) {
        return true;
    }
    let digits = content.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && (content[digits..].starts_with(". ") || content[digits..].starts_with(") "))
}

/// Index ranges of lines forming quote regions.
fn quote_regions(lines: &[SourceLine<'_>]) -> Vec<Range<usize>> {
    let mut regions: Vec<Range<usize>> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if line.depth == 0 {
            continue;
        }
        match regions.last_mut() {
            Some(region)
                if lines[region.end..index]
                    .iter()
                    .all(|between| between.depth == 0 && between.is_blank()) =>
            {
                region.end = index + 1;
            }
            _ => regions.push(index..index + 1),
        }
    }
    regions
}

/// A depth dropping below an earlier maximum within a stretch of quoted lines.
///
/// Blank `>` lines only separate blocks and never count as a drop.
fn needs_repair(lines: &[SourceLine<'_>]) -> bool {
    let mut max_depth = 0;
    for line in lines {
        if line.depth == 0 {
            max_depth = 0;
            continue;
        }
        if line.is_blank() {
            continue;
        }
        if line.depth < max_depth {
            return true;
        }
        max_depth = max_depth.max(line.depth);
    }
    false
}

/// Maximal spans of runs tagged with a quote depth.
fn quote_spans(runs: &[Run]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for (index, run) in runs.iter().enumerate() {
        if run.attributes.quote_depth.is_none() {
            continue;
        }
        match spans.last_mut() {
            Some(span) if span.end == index => span.end = index + 1,
            _ => spans.push(index..index + 1),
        }
    }
    spans
}
