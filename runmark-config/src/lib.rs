//! Shared configuration loader for the runmark toolchain.
//!
//! `defaults/runmark.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`RunmarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use runmark::{ParseOptions, RenderOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/runmark.default.toml");

/// Top-level configuration consumed by runmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RunmarkConfig {
    pub parse: ParseConfig,
    pub render: RenderConfig,
    pub inspect: InspectConfig,
}

/// Markdown → runs knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub repair_quote_depth: bool,
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            repair_quote_depth: config.repair_quote_depth,
        }
    }
}

/// Runs → Markdown knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub max_consecutive_newlines: usize,
    pub escape_line_starts: bool,
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            max_consecutive_newlines: config.max_consecutive_newlines,
            escape_line_starts: config.escape_line_starts,
        }
    }
}

/// Controls `inspect` output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub default_transform: String,
    pub include_runs: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RunmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RunmarkConfig, ConfigError> {
    Loader::new().build()
}
