//! Markdown format tests
//!
//! Tests for the Markdown ↔ runs conversion in both directions.

mod export;
mod import;
mod roundtrip;
