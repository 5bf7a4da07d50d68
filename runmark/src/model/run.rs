//! Runs: maximal spans of text sharing one immutable attribute set.

use serde::{Deserialize, Serialize};

/// Highest heading level Markdown can express.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Whether a list item belongs to a numbered or a bulleted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Position of a run inside a list.
///
/// The ordinal is 1-based and re-derived from item order while parsing. It is
/// only used to detect item boundaries; rendering always renumbers from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListMarker {
    pub kind: ListKind,
    pub ordinal: usize,
}

impl ListMarker {
    pub fn new(kind: ListKind, ordinal: usize) -> Self {
        ListMarker {
            kind,
            ordinal: ordinal.max(1),
        }
    }
}

/// Metadata carried by the single run that holds a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeBlockInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub content: String,
}

/// Styling an editing surface attaches to its runs with its own font traits.
///
/// The collector only consults these when the matching semantic attribute is
/// absent, so either source of truth is honored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeTraits {
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub strike: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The immutable attribute set of a run.
///
/// Inline flags (`bold`, `italic`, `strike`, `code`, `link`) describe
/// character styling; `heading_level`, `list_item`, `quote_depth` and
/// `code_block` are block-level tags; `paragraph_id` only exists so runs of one
/// source paragraph can be regrouped after inline segmentation split them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block: Option<CodeBlockInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_id: Option<usize>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Attributes {
    pub fn plain() -> Self {
        Attributes::default()
    }

    pub fn with_bold(&self) -> Self {
        let mut next = self.clone();
        next.bold = !next.code;
        next
    }

    pub fn with_italic(&self) -> Self {
        let mut next = self.clone();
        next.italic = !next.code;
        next
    }

    pub fn with_strike(&self) -> Self {
        let mut next = self.clone();
        next.strike = !next.code;
        next
    }

    /// Code suppresses every other inline decoration.
    pub fn with_code(&self) -> Self {
        let mut next = self.clone();
        next.code = true;
        next.bold = false;
        next.italic = false;
        next.strike = false;
        next.link = None;
        next
    }

    pub fn with_link(&self, destination: Option<String>) -> Self {
        let mut next = self.clone();
        if !next.code {
            next.link = destination;
        }
        next
    }

    pub fn with_heading_level(&self, level: u8) -> Self {
        let mut next = self.clone();
        next.heading_level = Some(level.clamp(1, MAX_HEADING_LEVEL));
        next
    }

    pub fn with_list_item(&self, marker: ListMarker) -> Self {
        let mut next = self.clone();
        next.list_item = Some(marker);
        next
    }

    /// A depth of zero clears the tag.
    pub fn with_quote_depth(&self, depth: usize) -> Self {
        let mut next = self.clone();
        next.quote_depth = (depth > 0).then_some(depth);
        next
    }

    pub fn with_code_block(&self, info: CodeBlockInfo) -> Self {
        let mut next = self.clone();
        next.code_block = Some(info);
        next
    }

    pub fn with_paragraph_id(&self, id: usize) -> Self {
        let mut next = self.clone();
        next.paragraph_id = Some(id);
        next
    }

    pub fn has_inline_decoration(&self) -> bool {
        self.bold || self.italic || self.strike || self.code || self.link.is_some()
    }

    /// True when any structural tag other than the paragraph id is present.
    pub fn has_block_tag(&self) -> bool {
        self.heading_level.is_some()
            || self.list_item.is_some()
            || self.quote_depth.is_some()
            || self.code_block.is_some()
    }

    /// True when the run belongs to some recognisable block, paragraphs included.
    pub fn is_structural(&self) -> bool {
        self.has_block_tag() || self.paragraph_id.is_some()
    }

    /// The inline part of the attribute set with every block tag dropped.
    pub fn inline_only(&self) -> Self {
        Attributes {
            bold: self.bold,
            italic: self.italic,
            strike: self.strike,
            code: self.code,
            link: self.link.clone(),
            ..Attributes::default()
        }
    }
}

/// Inline styling resolved for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl InlineStyle {
    /// Key for runs rendered under one set of emphasis wrappers inside a
    /// link group.
    ///
    /// Italic is absent: it is applied inside the group.
    pub fn emphasis_key(&self) -> (bool, bool) {
        (self.bold, self.strike)
    }

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.strike && !self.code && self.link.is_none()
    }
}

/// A span of text with one attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeTraits>,
}

impl Run {
    pub fn new(text: impl Into<String>, attributes: Attributes) -> Self {
        Run {
            text: text.into(),
            attributes,
            native: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Run::new(text, Attributes::plain())
    }

    pub fn newline() -> Self {
        Run::plain("\n")
    }

    pub fn with_native(mut self, native: NativeTraits) -> Self {
        self.native = Some(native);
        self
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_newline_only(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c == '\n')
    }

    /// Inline style from the semantic attributes, falling back to native
    /// traits for whatever the semantic attributes leave unset.
    pub fn effective_style(&self) -> InlineStyle {
        let attrs = &self.attributes;
        let native = self.native.as_ref();
        let code = attrs.code || native.is_some_and(|n| n.monospace);
        if code {
            return InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
        }
        InlineStyle {
            bold: attrs.bold || native.is_some_and(|n| n.bold),
            italic: attrs.italic || native.is_some_and(|n| n.italic),
            strike: attrs.strike || native.is_some_and(|n| n.strike),
            code: false,
            link: attrs
                .link
                .clone()
                .or_else(|| native.and_then(|n| n.link.clone())),
        }
    }

    pub fn has_inline_decoration(&self) -> bool {
        !self.effective_style().is_plain()
    }

    /// Split into the runs before and after `at` (a char offset).
    pub fn split_at_char(&self, at: usize) -> (Run, Run) {
        let byte = self
            .text
            .char_indices()
            .nth(at)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        let (head, tail) = self.text.split_at(byte);
        (
            Run {
                text: head.to_string(),
                attributes: self.attributes.clone(),
                native: self.native.clone(),
            },
            Run {
                text: tail.to_string(),
                attributes: self.attributes.clone(),
                native: self.native.clone(),
            },
        )
    }
}

/// An ordered run sequence.
///
/// Concatenating every run's text reconstructs the flattened character stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    pub runs: Vec<Run>,
}

impl RichText {
    pub fn new() -> Self {
        RichText::default()
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        let mut text = RichText::new();
        for run in runs {
            text.push(run);
        }
        text
    }

    /// Append a run, fusing it into the previous one when both share the exact
    /// same attributes. Empty runs are dropped.
    pub fn push(&mut self, run: Run) {
        if run.text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.attributes == run.attributes && last.native == run.native {
                last.text.push_str(&run.text);
                return;
            }
        }
        self.runs.push(run);
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn ends_with_newline(&self) -> bool {
        self.runs.last().is_some_and(|r| r.text.ends_with('\n'))
    }

    pub fn has_inline_decoration(&self) -> bool {
        self.runs.iter().any(Run::has_inline_decoration)
    }
}

impl From<Vec<Run>> for RichText {
    fn from(runs: Vec<Run>) -> Self {
        RichText::from_runs(runs)
    }
}

impl<'a> IntoIterator for &'a RichText {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}
