//! Format implementations
//!
//! This module contains all format implementations that convert between a
//! run sequence and its text representations.

pub mod display;
pub mod icons;
pub mod markdown;
pub mod runs_json;
pub mod treeviz;

pub use display::DisplayJsonFormat;
pub use markdown::MarkdownFormat;
pub use runs_json::RunsJsonFormat;
pub use treeviz::TreevizFormat;
