//! Structural blocks: the serializer's view of a run sequence.

use crate::model::run::Run;
use serde::Serialize;

/// One line of a block quote. An empty line is a paragraph separator inside
/// the quote and renders as a bare marker.
pub type QuoteLine = Vec<Run>;

/// A structural unit of rendered Markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Run>,
    },
    UnorderedList {
        items: Vec<Vec<Run>>,
    },
    OrderedList {
        items: Vec<Vec<Run>>,
    },
    BlockQuote {
        depth: usize,
        lines: Vec<QuoteLine>,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    Paragraph {
        content: Vec<Run>,
    },
    Blank {
        count: usize,
    },
}

impl Block {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::UnorderedList { .. } => "unordered-list",
            Block::OrderedList { .. } => "ordered-list",
            Block::BlockQuote { .. } => "block-quote",
            Block::CodeBlock { .. } => "code-block",
            Block::Paragraph { .. } => "paragraph",
            Block::Blank { .. } => "blank",
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Block::Blank { .. })
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, Block::BlockQuote { .. })
    }
}
