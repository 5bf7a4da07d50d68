//! Display path: restored spacing and presentation flags.

use runmark::transforms::markdown_to_display_runs;
use runmark::{DisplayRun, Emphasis, FormatRegistry, ParseOptions};

fn display(source: &str) -> Vec<DisplayRun> {
    markdown_to_display_runs(source, &ParseOptions::default())
}

fn flattened(runs: &[DisplayRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

#[test]
fn test_blank_lines_after_a_list_are_restored() {
    let runs = display("- a\n- b\n\n\nPara\n");
    assert_eq!(flattened(&runs), "a\nb\n\n\nPara\n");
}

#[test]
fn test_blank_line_between_paragraphs_is_restored() {
    assert_eq!(flattened(&display("A\n\nB\n")), "A\n\nB\n");
    assert_eq!(flattened(&display("A\nB\n\n\nC\n")), "A\nB\n\n\nC\n");
}

#[test]
fn test_blank_line_after_heading_is_restored() {
    let runs = display("# T\n\nBody\n");
    assert_eq!(flattened(&runs), "T\n\nBody\n");
    assert_eq!(runs[0].attributes.heading_level, Some(1));
    assert!(!runs[1].attributes.is_structural());
}

#[test]
fn test_document_without_blank_lines_is_untouched() {
    let runs = display("line one\nline two\n");
    assert_eq!(flattened(&runs), "line one\nline two\n");
}

#[test]
fn test_inserted_blank_runs_are_plain() {
    let runs = display("- a\n\n\nPara\n");
    let blank = runs
        .iter()
        .find(|run| run.text == "\n\n")
        .expect("restored blank lines");
    assert_eq!(blank.presentation.emphasis, Emphasis::Regular);
    assert!(!blank.attributes.is_structural());
}

#[test]
fn test_presentation_follows_inline_styles() {
    let runs = display("**bold** *it* ~~gone~~ `mono` [site](https://example.com)\n");
    let find = |text: &str| {
        runs.iter()
            .find(|run| run.text == text)
            .unwrap_or_else(|| panic!("no run {text:?}"))
    };

    assert_eq!(find("bold").presentation.emphasis, Emphasis::Bold);
    assert_eq!(find("it").presentation.emphasis, Emphasis::Italic);
    assert!(find("gone").presentation.strikethrough);
    assert!(find("mono").presentation.monospace);
    assert_eq!(
        find("site").presentation.link.as_deref(),
        Some("https://example.com")
    );
}

#[test]
fn test_display_json_through_registry() {
    let registry = FormatRegistry::default();
    let runs = registry.parse("***both***\n", "markdown").unwrap();
    let json = registry.serialize(&runs, "display-json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value[0]["text"], "both");
    assert_eq!(value[0]["presentation"]["emphasis"], "bold-italic");
    assert_eq!(value[0]["attributes"]["paragraph_id"], 0);
}
