//! Link destinations: validation when importing, escaping when exporting.
//!
//! An absent or invalid destination is never an error. It simply means the
//! text carries no link. Relative destinations (`page.md`, `#anchor`,
//! `/docs`) are valid; anything that names a scheme must parse as a URL.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::{ParseError, Url};

/// Characters percent-encoded in a serialized destination.
const DESTINATION_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ');

/// Validate a raw destination taken from a parsed link node.
///
/// Returns the destination unchanged when it is usable, so that the exact
/// source spelling survives a round trip (no URL normalization).
pub fn parse_destination(raw: &str) -> Option<String> {
    if raw.trim().is_empty() || raw.chars().any(|c| c.is_control()) {
        return None;
    }

    match Url::parse(raw) {
        Ok(_) => Some(raw.to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => Some(raw.to_string()),
        Err(err) => {
            tracing::debug!(destination = raw, error = %err, "dropping invalid link destination");
            None
        }
    }
}

/// Serialize a destination for use inside `[text](...)`.
///
/// Spaces are percent-encoded; parentheses and brackets are backslash-escaped.
pub fn escape_destination(destination: &str) -> String {
    let encoded = utf8_percent_encode(destination, DESTINATION_ENCODE_SET).to_string();
    let mut out = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if matches!(c, '(' | ')' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
