//! The run-based rich-text model.
//!
//! A document is a [`RichText`]: an ordered sequence of [`Run`]s. Block
//! structure is not nested, it is carried as tags on each run. The serializer
//! regroups runs into [`Block`]s before emitting Markdown.

pub mod block;
pub mod run;

pub use block::{Block, QuoteLine};
pub use run::{
    Attributes, CodeBlockInfo, InlineStyle, ListKind, ListMarker, NativeTraits, RichText, Run,
    MAX_HEADING_LEVEL,
};
