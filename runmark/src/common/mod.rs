//! Format-agnostic passes over the run model.
//!
//! - [`quote_depth`]: repairs quote nesting the AST walk could not express.
//! - [`collect`]: groups runs into blocks for serialization.
//! - [`blank_lines`]: restores source spacing for display.
//! - [`links`]: validates and escapes link destinations.

pub mod blank_lines;
pub mod collect;
pub mod links;
pub mod quote_depth;
