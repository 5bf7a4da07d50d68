//! Shared helpers for the integration tests.

use runmark::model::{Block, RichText};
use std::path::PathBuf;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// `render(parse(source))`
pub fn round_trip(source: &str) -> String {
    runmark::render(&runmark::parse(source))
}

/// Quote depth of every run that carries text other than newlines.
pub fn text_depths(runs: &RichText) -> Vec<Option<usize>> {
    runs.iter()
        .filter(|run| !run.is_newline_only())
        .map(|run| run.attributes.quote_depth)
        .collect()
}

/// Kind names of collected blocks.
pub fn block_kinds(blocks: &[Block]) -> Vec<&'static str> {
    blocks.iter().map(Block::kind_name).collect()
}
