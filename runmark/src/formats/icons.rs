//! Shared icon mapping for tree visualization
//!
//! One glyph per block kind, shared by every tree view.

/// Get the Unicode icon for a block kind (see `Block::kind_name`) or a tree
/// element (`document`, `item`, `line`, `run`).
pub fn get_icon(kind: &str) -> &'static str {
    match kind {
        "document" => "⧉",
        "heading" => "§",
        "paragraph" => "¶",
        "unordered-list" | "ordered-list" => "☰",
        "item" => "•",
        "block-quote" => "\"",
        "line" => "↵",
        "code-block" => "𝒱",
        "blank" => "⎯",
        "run" => "◦",
        _ => "○",
    }
}
