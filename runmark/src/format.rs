//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for turning text into a run sequence and back.

use crate::error::FormatError;
use crate::model::RichText;
use std::collections::HashMap;

/// Extra parameters passed to a format, usually from `--extra-<key>` flags.
pub type FormatOptions = HashMap<String, String>;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and a
/// [`RichText`] run sequence. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct PlainFormat;
///
/// impl Format for PlainFormat {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<RichText, FormatError> {
///         Ok(RichText::from_runs(vec![Run::plain(source)]))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "runs-json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → runs)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (runs → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a run sequence
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<RichText, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a run sequence into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _runs: &RichText) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Parse, optionally using extra parameters.
    ///
    /// The default implementation delegates to [`Format::parse`] and rejects
    /// any parameter.
    fn parse_with_options(
        &self,
        source: &str,
        options: &FormatOptions,
    ) -> Result<RichText, FormatError> {
        reject_options(self.name(), options)?;
        self.parse(source)
    }

    /// Serialize, optionally using extra parameters.
    ///
    /// The default implementation delegates to [`Format::serialize`] and
    /// rejects any parameter.
    fn serialize_with_options(
        &self,
        runs: &RichText,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        reject_options(self.name(), options)?;
        self.serialize(runs)
    }
}

fn reject_options(name: &str, options: &FormatOptions) -> Result<(), FormatError> {
    if options.is_empty() {
        Ok(())
    } else {
        Err(FormatError::NotSupported(format!(
            "Format '{name}' does not support extra parameters"
        )))
    }
}

/// Read a boolean extra parameter. A present key with no value means `true`.
pub fn bool_option(options: &FormatOptions, key: &str) -> Result<Option<bool>, FormatError> {
    match options.get(key).map(String::as_str) {
        None => Ok(None),
        Some("" | "true" | "yes" | "1") => Ok(Some(true)),
        Some("false" | "no" | "0") => Ok(Some(false)),
        Some(other) => Err(FormatError::NotSupported(format!(
            "Invalid value '{other}' for '{key}', expected true or false"
        ))),
    }
}

/// Read an unsigned integer extra parameter.
pub fn usize_option(options: &FormatOptions, key: &str) -> Result<Option<usize>, FormatError> {
    options
        .get(key)
        .map(|value| {
            value.parse::<usize>().map_err(|_| {
                FormatError::NotSupported(format!(
                    "Invalid value '{value}' for '{key}', expected a number"
                ))
            })
        })
        .transpose()
}
