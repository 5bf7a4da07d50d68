//! Error types for format operations

use thiserror::Error;

/// Errors that can occur during format operations
///
/// The conversion pipeline itself never fails: normalization passes fall back
/// to their input. Errors only come from the format layer (unknown formats,
/// undecodable input, bad options).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}
