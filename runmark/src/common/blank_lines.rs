//! Display-path spacing and presentation.
//!
//! Parsing keeps only structural newlines, so runs of blank lines between
//! paragraphs vanish. For on-screen display the vertical rhythm of the source
//! is put back heuristically: each run of blank source lines is re-inserted
//! at the end of the content line it followed.
//!
//! A content line of the run text ends either at a newline or where one block
//! gives way to the next without one (paragraph to paragraph, heading to
//! paragraph). In the second case the inserted run also carries the missing
//! line terminator. Source-only markers (`>`, `#`, list bullets, fences) do
//! not survive parsing, so the alignment is best effort and never used for
//! serialization.
//!
//! The same pass lifts the inline attributes of every run into a single
//! [`Presentation`] value, so a renderer that knows nothing about the run
//! schema can still show emphasis, strikethrough, code and links.

use crate::model::{Attributes, RichText, Run};
use serde::Serialize;

/// Weight and slant of a displayed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emphasis {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl Emphasis {
    fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Emphasis::Regular,
            (true, false) => Emphasis::Bold,
            (false, true) => Emphasis::Italic,
            (true, true) => Emphasis::BoldItalic,
        }
    }
}

/// Schema-free styling for one displayed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub emphasis: Emphasis,
    pub strikethrough: bool,
    pub monospace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Presentation {
    /// Monospace wins over emphasis on the same run.
    pub fn of(run: &Run) -> Self {
        let style = run.effective_style();
        if style.code {
            return Presentation {
                monospace: true,
                ..Presentation::default()
            };
        }
        Presentation {
            emphasis: Emphasis::from_flags(style.bold, style.italic),
            strikethrough: style.strike,
            monospace: false,
            link: style.link,
        }
    }
}

/// A run ready for a display surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRun {
    pub text: String,
    pub attributes: Attributes,
    pub presentation: Presentation,
}

impl From<Run> for DisplayRun {
    fn from(run: Run) -> Self {
        let presentation = Presentation::of(&run);
        DisplayRun {
            text: run.text,
            attributes: run.attributes,
            presentation,
        }
    }
}

/// A maximal stretch of blank source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlankStretch {
    /// Index of the content line right before the stretch, `None` at the
    /// start of the document.
    after: Option<usize>,
    count: usize,
}

/// Restore blank-line spacing from `source` and lift presentation flags.
pub fn restore_blank_lines(runs: &RichText, source: &str) -> Vec<DisplayRun> {
    let stretches = blank_stretches(source);
    let mut spaced: Vec<Run> = runs.runs.clone();

    if !stretches.is_empty() {
        let ends = line_ends(runs);
        let mut pending: Vec<(Option<usize>, usize)> = stretches
            .iter()
            .map(|stretch| match placement(stretch, &ends) {
                Some((at, newlines)) => (Some(at), newlines),
                None => (None, stretch.count),
            })
            .collect();

        // Back to front so earlier offsets stay valid
        while let Some((position, newlines)) = pending.pop() {
            let total: usize = spaced.iter().map(Run::char_len).sum();
            let at = match position {
                Some(at) if at <= total => at,
                _ => {
                    tracing::trace!(?position, newlines, "blank stretch out of range, appending");
                    total
                }
            };
            insert_run(&mut spaced, at, Run::plain("\n".repeat(newlines)));
            for (other, _) in pending.iter_mut() {
                if let Some(offset) = other.as_mut() {
                    if *offset >= at {
                        *offset += newlines;
                    }
                }
            }
        }
    }

    spaced.into_iter().map(DisplayRun::from).collect()
}

/// Lift presentation flags without touching spacing.
pub fn display_runs(runs: &RichText) -> Vec<DisplayRun> {
    runs.iter().cloned().map(DisplayRun::from).collect()
}

fn blank_stretches(source: &str) -> Vec<BlankStretch> {
    let mut stretches = Vec::new();
    let mut last_content = None;
    let mut content_index = 0;
    let mut blanks = 0;

    for line in source.lines() {
        if line.trim().is_empty() {
            blanks += 1;
            continue;
        }
        if blanks > 0 {
            stretches.push(BlankStretch {
                after: last_content,
                count: blanks,
            });
            blanks = 0;
        }
        last_content = Some(content_index);
        content_index += 1;
    }
    if blanks > 0 {
        stretches.push(BlankStretch {
            after: last_content,
            count: blanks,
        });
    }
    stretches
}

/// The end of one content line in the flattened run text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineEnd {
    /// Char offset right after the line.
    offset: usize,
    /// False when a block change ends the line without a newline.
    terminated: bool,
}

/// Every content line end of the run text, in order.
fn line_ends(runs: &RichText) -> Vec<LineEnd> {
    let mut ends = Vec::new();
    let mut offset = 0;
    let mut previous: Option<&Run> = None;

    for run in runs.iter().filter(|run| !run.text.is_empty()) {
        if let Some(previous) = previous {
            let unterminated = !previous.text.ends_with('\n') && !run.text.starts_with('\n');
            if unterminated && starts_new_block(previous, run) {
                ends.push(LineEnd {
                    offset,
                    terminated: false,
                });
            }
        }
        for c in run.text.chars() {
            offset += 1;
            if c == '\n' {
                ends.push(LineEnd {
                    offset,
                    terminated: true,
                });
            }
        }
        previous = Some(run);
    }
    ends
}

fn starts_new_block(previous: &Run, next: &Run) -> bool {
    let (a, b) = (&previous.attributes, &next.attributes);
    a.paragraph_id != b.paragraph_id
        || a.heading_level != b.heading_level
        || a.list_item != b.list_item
        || a.quote_depth != b.quote_depth
        || a.code_block != b.code_block
}

/// Insertion offset and newline count for a stretch, `None` when the content
/// line it follows has no counterpart in the run text.
fn placement(stretch: &BlankStretch, ends: &[LineEnd]) -> Option<(usize, usize)> {
    match stretch.after {
        None => Some((0, stretch.count)),
        Some(line) => ends.get(line).map(|end| {
            let terminator = usize::from(!end.terminated);
            (end.offset, stretch.count + terminator)
        }),
    }
}

/// Insert `run` at char offset `at`, splitting the run that straddles it.
fn insert_run(runs: &mut Vec<Run>, at: usize, run: Run) {
    let mut start = 0;
    for index in 0..runs.len() {
        let len = runs[index].char_len();
        if at == start {
            runs.insert(index, run);
            return;
        }
        if at < start + len {
            let (head, tail) = runs[index].split_at_char(at - start);
            runs[index] = head;
            runs.insert(index + 1, run);
            runs.insert(index + 2, tail);
            return;
        }
        start += len;
    }
    runs.push(run);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;

    fn flattened(runs: &[DisplayRun]) -> String {
        runs.iter().map(|run| run.text.as_str()).collect()
    }

    #[test]
    fn test_blank_stretches_record_preceding_content_line() {
        let stretches = blank_stretches("\nA\nB\n\n\nC\n  \n");
        assert_eq!(
            stretches,
            vec![
                BlankStretch { after: None, count: 1 },
                BlankStretch { after: Some(1), count: 2 },
                BlankStretch { after: Some(2), count: 1 },
            ]
        );
    }

    #[test]
    fn test_final_terminator_is_not_a_blank_line() {
        assert!(blank_stretches("A\nB\n").is_empty());
    }

    #[test]
    fn test_inserts_after_matching_newline() {
        let runs = RichText::from_runs(vec![Run::plain("A\nB\nC\n")]);
        let display = restore_blank_lines(&runs, "A\n\n\nB\nC\n");
        assert_eq!(flattened(&display), "A\n\n\nB\nC\n");
    }

    #[test]
    fn test_insertions_keep_document_order() {
        let runs = RichText::from_runs(vec![Run::plain("A\nB\nC\n")]);
        let display = restore_blank_lines(&runs, "\nA\n\nB\n\n\nC\n");
        assert_eq!(flattened(&display), "\nA\n\nB\n\n\nC\n");
    }

    #[test]
    fn test_splits_a_styled_run_at_the_anchor() {
        let bold = Attributes::plain().with_bold();
        let runs = RichText::from_runs(vec![Run::new("A\nB", bold.clone())]);
        let display = restore_blank_lines(&runs, "A\n\nB");
        assert_eq!(flattened(&display), "A\n\nB");
        assert_eq!(display.len(), 3);
        assert_eq!(display[0].presentation.emphasis, Emphasis::Bold);
        assert_eq!(display[1].presentation.emphasis, Emphasis::Regular);
        assert_eq!(display[2].attributes, bold);
    }

    #[test]
    fn test_block_change_ends_a_line() {
        let runs = RichText::from_runs(vec![
            Run::new("T", Attributes::plain().with_heading_level(1)),
            Run::new("Body ", Attributes::plain().with_paragraph_id(0)),
            Run::new("b", Attributes::plain().with_paragraph_id(0).with_bold()),
            Run::newline(),
        ]);
        assert_eq!(
            line_ends(&runs),
            vec![
                LineEnd {
                    offset: 1,
                    terminated: false,
                },
                LineEnd {
                    offset: 8,
                    terminated: true,
                },
            ]
        );
    }

    #[test]
    fn test_paragraph_change_gets_terminator_and_blank_lines() {
        let p = |id| Attributes::plain().with_paragraph_id(id);
        let runs = RichText::from_runs(vec![
            Run::new("A", p(0)),
            Run::new("B", p(1)),
            Run::newline(),
        ]);
        let display = restore_blank_lines(&runs, "A\n\n\nB\n");
        assert_eq!(flattened(&display), "A\n\n\nB\n");
        assert_eq!(display[1].text, "\n\n\n");
        assert!(!display[1].attributes.is_structural());
    }

    #[test]
    fn test_out_of_range_anchor_appends() {
        let runs = RichText::from_runs(vec![Run::plain("AB")]);
        let display = restore_blank_lines(&runs, "A\n\nB\n");
        assert_eq!(flattened(&display), "AB\n");
    }

    #[test]
    fn test_code_suppresses_emphasis_in_presentation() {
        let run = Run::plain("x").with_native(crate::model::NativeTraits {
            bold: true,
            monospace: true,
            ..Default::default()
        });
        let presentation = Presentation::of(&run);
        assert!(presentation.monospace);
        assert_eq!(presentation.emphasis, Emphasis::Regular);
    }

    #[test]
    fn test_presentation_lifts_combined_flags() {
        let attrs = Attributes::plain()
            .with_bold()
            .with_italic()
            .with_strike()
            .with_link(Some("https://example.com".into()));
        let presentation = Presentation::of(&Run::new("x", attrs));
        assert_eq!(presentation.emphasis, Emphasis::BoldItalic);
        assert!(presentation.strikethrough);
        assert_eq!(presentation.link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_display_runs_keeps_spacing() {
        let runs = RichText::from_runs(vec![Run::plain("A\nB")]);
        assert_eq!(flattened(&display_runs(&runs)), "A\nB");
    }
}
