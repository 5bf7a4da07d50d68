//! Non-lossy bridge between Markdown and a run-based rich-text model
//!
//!     A run is a span of text with one immutable attribute set. A rich-text surface edits runs;
//!     Markdown stores them. This crate converts between the two so that canonical Markdown
//!     survives `render(parse(x)) == x`, and anything else converges to canonical form after one
//!     round trip.
//!
//!     This is a pure lib: no printing, no environment access, no file I/O. The CLI lives in
//!     runmark-cli.
//!
//! Architecture
//!
//!     Markdown → runs:
//!         comrak AST → AST walk (formats/markdown/parser.rs) → quote-depth repair
//!         (common/quote_depth.rs)
//!
//!     Runs → Markdown:
//!         run → block collection (common/collect.rs) → block and inline rendering
//!         (formats/markdown/serializer.rs)
//!
//!     Runs → display:
//!         blank-line restoration and presentation flags (common/blank_lines.rs)
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── transforms.rs           # Functional shortcuts over the Markdown format
//!     ├── model                   # Runs, attributes, blocks
//!     ├── common                  # Format-agnostic passes over runs
//!     └── formats
//!         ├── markdown            # parser.rs, serializer.rs, escape.rs
//!         ├── runs_json           # Run exchange format
//!         ├── display             # Display runs (serialize only)
//!         └── treeviz             # Block tree (serialize only)
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # Aggregates the modules below
//!     └── <area>/mod.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so the aggregator
//!     includes every module.
//!
//! Failure Model
//!
//!     The pipeline never fails. Normalization passes that cannot do their job safely return
//!     their input unchanged and say so at debug level through `tracing`. Invalid link
//!     destinations mean "no link". Only the format layer returns [`FormatError`] (unknown
//!     formats, undecodable JSON, bad extra parameters).

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod registry;
pub mod transforms;

pub use common::blank_lines::{DisplayRun, Emphasis, Presentation};
pub use error::FormatError;
pub use format::{Format, FormatOptions};
pub use formats::markdown::parser::ParseOptions;
pub use formats::markdown::serializer::RenderOptions;
pub use model::{Attributes, Block, RichText, Run};
pub use registry::FormatRegistry;

/// Parse Markdown into a run sequence.
pub fn parse(source: &str) -> RichText {
    transforms::markdown_to_runs(source)
}

/// Render a run sequence (from parsing or from an editing surface) as Markdown.
pub fn render(runs: &RichText) -> String {
    transforms::runs_to_markdown(runs)
}
