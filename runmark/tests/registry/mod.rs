//! Conversions through the format registry.

use crate::common::fixture;
use runmark::{FormatError, FormatOptions, FormatRegistry};

#[test]
fn test_markdown_through_runs_json_and_back() {
    let registry = FormatRegistry::default();
    let source = fixture("kitchensink.md");

    let runs = registry.parse(&source, "markdown").unwrap();
    let json = registry.serialize(&runs, "runs-json").unwrap();
    let decoded = registry.parse(&json, "runs-json").unwrap();

    assert_eq!(decoded, runs);
    assert_eq!(registry.serialize(&decoded, "markdown").unwrap(), source);
}

#[test]
fn test_hand_written_runs_json_renders() {
    let registry = FormatRegistry::default();
    let json = r#"[
        { "text": "Title", "attributes": { "heading_level": 2 } },
        { "text": "Some " },
        { "text": "bold", "attributes": { "bold": true } },
        { "text": " text" }
    ]"#;

    let runs = registry.parse(json, "runs-json").unwrap();
    assert_eq!(
        registry.serialize(&runs, "markdown").unwrap(),
        "## Title\n\nSome **bold** text"
    );
}

#[test]
fn test_invalid_runs_json_is_a_parse_error() {
    let registry = FormatRegistry::default();
    let result = registry.parse("{ not json", "runs-json");
    assert!(matches!(result, Err(FormatError::ParseError(_))));
}

#[test]
fn test_unknown_format_is_reported_by_name() {
    let registry = FormatRegistry::default();
    let err = registry.parse("x", "asciidoc").unwrap_err();
    assert_eq!(err, FormatError::FormatNotFound("asciidoc".to_string()));
    assert_eq!(err.to_string(), "Format 'asciidoc' not found");
}

#[test]
fn test_treeviz_cannot_parse() {
    let registry = FormatRegistry::default();
    assert!(matches!(
        registry.parse("x", "treeviz"),
        Err(FormatError::NotSupported(_))
    ));
}

#[test]
fn test_markdown_options_through_registry() {
    let registry = FormatRegistry::default();
    let runs = registry.parse("> A\n> > B\n> C\n", "markdown").unwrap();

    let mut options = FormatOptions::new();
    options.insert("escape-line-starts".to_string(), "no".to_string());
    assert_eq!(
        registry
            .serialize_with_options(&runs, "markdown", &options)
            .unwrap(),
        "> A\n> > B\n> C\n"
    );

    options.insert("escape-line-starts".to_string(), "perhaps".to_string());
    assert!(registry
        .serialize_with_options(&runs, "markdown", &options)
        .is_err());
}

#[test]
fn test_raw_parse_option_keeps_parser_depths() {
    let registry = FormatRegistry::default();
    let mut options = FormatOptions::new();
    options.insert("repair-quote-depth".to_string(), "false".to_string());

    let runs = registry
        .parse_with_options("> A\n> > B\n> C\n", "markdown", &options)
        .unwrap();
    assert_eq!(crate::common::text_depths(&runs), vec![Some(1), Some(2)]);
}
