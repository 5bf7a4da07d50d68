//! Groups a flat run sequence into structural blocks.
//!
//! # The High-Level Concept
//!
//! A run sequence has no nesting: block structure is carried as tags on every
//! run. Reading left to right, the collector looks at the run under the cursor
//! and applies the first rule that matches, consuming as many runs as the rule
//! claims. Tags are checked in a fixed priority order, so a run that carries
//! more than one block tag is claimed by the first category that matches.
//!
//! # The Rules
//!
//! a. A code-block run is one code block on its own.
//! b. Runs sharing one heading level form a heading.
//! c. Runs sharing one list kind form a list; an ordinal change starts a new item.
//! d. Runs sharing one quote depth form a quote, split into lines at newlines
//!    and at paragraph changes. An empty line becomes a bare `>` separator. A
//!    quote without any non-empty line falls through.
//! e. Runs sharing one paragraph id form a paragraph.
//! f. Newline-only runs form a blank run whose length is the number of
//!    newlines. A single newline next to a paragraph or a quote is just a
//!    separator; after a loose paragraph with the same style it becomes a line
//!    break inside it; otherwise it is a one-line blank.
//! g. Any other untagged text accumulates into a loose paragraph; a lone
//!    newline between two text runs is a soft break, two newlines end it.
//! h. Whatever is left becomes a one-run paragraph.
//!
//! Newlines at the very end of the sequence terminate the document and do not
//! produce a block.

use crate::model::{Block, ListKind, QuoteLine, RichText, Run};

/// Which rule produced the most recent block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    KeyedParagraph,
    LooseParagraph,
    Quote,
    Other,
}

/// Group a run sequence into blocks.
pub fn collect_blocks(text: &RichText) -> Vec<Block> {
    let mut collector = Collector::new(explode_newlines(text));
    collector.run();
    collector.blocks
}

/// Split every untagged run at its newlines so each newline is its own run.
fn explode_newlines(text: &RichText) -> Vec<Run> {
    let mut runs = Vec::with_capacity(text.len());
    for run in text {
        if run.attributes.is_structural() || !run.text.contains('\n') {
            runs.push(run.clone());
            continue;
        }
        for (index, piece) in run.text.split('\n').enumerate() {
            if index > 0 {
                runs.push(with_text(run, "\n"));
            }
            if !piece.is_empty() {
                runs.push(with_text(run, piece));
            }
        }
    }
    runs
}

fn with_text(run: &Run, text: &str) -> Run {
    Run {
        text: text.to_string(),
        attributes: run.attributes.clone(),
        native: run.native.clone(),
    }
}

fn is_loose_text(run: &Run) -> bool {
    !run.attributes.is_structural() && !run.is_newline_only()
}

fn is_loose_newline(run: &Run) -> bool {
    !run.attributes.is_structural() && run.is_newline_only()
}

struct Collector {
    runs: Vec<Run>,
    pos: usize,
    blocks: Vec<Block>,
    last_origin: Option<Origin>,
}

impl Collector {
    fn new(runs: Vec<Run>) -> Self {
        Collector {
            runs,
            pos: 0,
            blocks: Vec::new(),
            last_origin: None,
        }
    }

    fn emit(&mut self, block: Block, origin: Origin) {
        tracing::trace!(kind = block.kind_name(), at = self.pos, "collected block");
        self.blocks.push(block);
        self.last_origin = Some(origin);
    }

    /// Length of the run stretch starting at the cursor that satisfies `pred`.
    fn stretch(&self, pred: impl Fn(&Run) -> bool) -> usize {
        self.runs[self.pos..].iter().take_while(|run| pred(run)).count()
    }

    fn take(&mut self, len: usize) -> Vec<Run> {
        let taken = self.runs[self.pos..self.pos + len].to_vec();
        self.pos += len;
        taken
    }

    fn run(&mut self) {
        while self.pos < self.runs.len() {
            if self.code_block()
                || self.heading()
                || self.list()
                || self.quote()
                || self.keyed_paragraph()
                || self.blank()
                || self.loose_paragraph()
            {
                continue;
            }
            self.fallback();
        }
    }

    fn current(&self) -> &Run {
        &self.runs[self.pos]
    }

    fn code_block(&mut self) -> bool {
        let run = self.current();
        let Some(info) = run.attributes.code_block.as_ref() else {
            return false;
        };

        let content = if info.content.is_empty() && run.is_newline_only() {
            String::new()
        } else {
            run.text.clone()
        };
        let block = Block::CodeBlock {
            language: info.language.clone(),
            content,
        };
        self.pos += 1;
        self.emit(block, Origin::Other);
        true
    }

    fn heading(&mut self) -> bool {
        let Some(level) = self.current().attributes.heading_level else {
            return false;
        };

        let len = self.stretch(|run| {
            run.attributes.code_block.is_none() && run.attributes.heading_level == Some(level)
        });
        let content = self.take(len);
        self.emit(Block::Heading { level, content }, Origin::Other);
        true
    }

    fn list(&mut self) -> bool {
        let Some(first) = self.current().attributes.list_item else {
            return false;
        };

        let len = self.stretch(|run| {
            let attrs = &run.attributes;
            attrs.code_block.is_none()
                && attrs.heading_level.is_none()
                && attrs.list_item.map(|marker| marker.kind) == Some(first.kind)
        });

        let mut items: Vec<Vec<Run>> = Vec::new();
        let mut current_ordinal = None;
        for run in self.take(len) {
            let ordinal = run.attributes.list_item.map(|marker| marker.ordinal);
            if ordinal != current_ordinal || items.is_empty() {
                items.push(Vec::new());
                current_ordinal = ordinal;
            }
            if let Some(item) = items.last_mut() {
                item.push(run);
            }
        }

        let block = match first.kind {
            ListKind::Ordered => Block::OrderedList { items },
            ListKind::Unordered => Block::UnorderedList { items },
        };
        self.emit(block, Origin::Other);
        true
    }

    fn quote(&mut self) -> bool {
        let Some(depth) = self.current().attributes.quote_depth else {
            return false;
        };

        let len = self.stretch(|run| {
            let attrs = &run.attributes;
            attrs.code_block.is_none()
                && attrs.heading_level.is_none()
                && attrs.list_item.is_none()
                && attrs.quote_depth == Some(depth)
        });
        let lines = quote_lines(&self.runs[self.pos..self.pos + len]);
        if lines.iter().all(Vec::is_empty) {
            return false;
        }

        self.pos += len;
        self.emit(Block::BlockQuote { depth, lines }, Origin::Quote);
        true
    }

    fn keyed_paragraph(&mut self) -> bool {
        let Some(id) = self.current().attributes.paragraph_id else {
            return false;
        };
        if self.current().attributes.has_block_tag() {
            return false;
        }

        let len = self.stretch(|run| {
            !run.attributes.has_block_tag() && run.attributes.paragraph_id == Some(id)
        });
        let content = self.take(len);
        self.emit(Block::Paragraph { content }, Origin::KeyedParagraph);
        true
    }

    fn blank(&mut self) -> bool {
        if !is_loose_newline(self.current()) {
            return false;
        }

        let len = self.stretch(is_loose_newline);
        let count: usize = self.runs[self.pos..self.pos + len]
            .iter()
            .map(|run| run.text.chars().count())
            .sum();
        let newline = self.current().clone();
        self.pos += len;

        if self.pos == self.runs.len() {
            // Document terminator
            return true;
        }
        if count >= 2 {
            self.emit(Block::Blank { count }, Origin::Other);
            return true;
        }

        let next = &self.runs[self.pos];
        let next_is_context =
            next.attributes.paragraph_id.is_some() || next.attributes.quote_depth.is_some();
        if next_is_context
            || matches!(
                self.last_origin,
                Some(Origin::KeyedParagraph) | Some(Origin::Quote)
            )
        {
            return true;
        }

        if self.last_origin == Some(Origin::LooseParagraph) {
            if let Some(Block::Paragraph { content }) = self.blocks.last_mut() {
                let same_style = content
                    .last()
                    .is_some_and(|trailing| trailing.effective_style() == newline.effective_style());
                if same_style {
                    content.push(newline);
                    return true;
                }
            }
        }

        self.emit(Block::Blank { count: 1 }, Origin::Other);
        true
    }

    fn loose_paragraph(&mut self) -> bool {
        if !is_loose_text(self.current()) {
            return false;
        }

        let mut end = self.pos + 1;
        while end < self.runs.len() {
            let run = &self.runs[end];
            if is_loose_text(run) {
                end += 1;
                continue;
            }
            // A lone newline between two pieces of text is a soft break
            let soft_break = is_loose_newline(run)
                && run.text == "\n"
                && self.runs.get(end + 1).is_some_and(is_loose_text);
            if soft_break {
                end += 1;
                continue;
            }
            break;
        }

        let content = self.take(end - self.pos);
        self.emit(Block::Paragraph { content }, Origin::LooseParagraph);
        true
    }

    fn fallback(&mut self) {
        let content = self.take(1);
        self.emit(Block::Paragraph { content }, Origin::Other);
    }
}

/// Split the runs of one quote into lines.
///
/// A newline ends the current line; a newline ending an empty line leaves an
/// empty separator line (a bare `>`). A change of paragraph ends the line too
/// and leaves a separator. Separators never repeat and never trail.
fn quote_lines(runs: &[Run]) -> Vec<QuoteLine> {
    let mut lines: Vec<QuoteLine> = Vec::new();
    let mut current: QuoteLine = Vec::new();
    let mut paragraph = None;

    fn flush(lines: &mut Vec<QuoteLine>, current: &mut QuoteLine) {
        if !current.is_empty() {
            lines.push(std::mem::take(current));
        }
    }

    fn separate(lines: &mut Vec<QuoteLine>) {
        if lines.last().map_or(true, |line| !line.is_empty()) {
            lines.push(Vec::new());
        }
    }

    for run in runs {
        let id = run.attributes.paragraph_id;
        if id.is_some() {
            if paragraph.is_some() && id != paragraph {
                flush(&mut lines, &mut current);
                if !lines.is_empty() {
                    separate(&mut lines);
                }
            }
            paragraph = id;
        }

        for (index, piece) in run.text.split('\n').enumerate() {
            if index > 0 {
                if current.is_empty() {
                    separate(&mut lines);
                } else {
                    flush(&mut lines, &mut current);
                }
            }
            if !piece.is_empty() {
                current.push(with_text(run, piece));
            }
        }
    }
    flush(&mut lines, &mut current);

    while lines.last().is_some_and(Vec::is_empty) {
        lines.pop();
    }
    lines
}
