//! Export tests for Markdown format (runs → Markdown)
//!
//! Runs here are built by hand the way an editing surface would hand them
//! over: no paragraph ids, newlines as plain text, styling either semantic or
//! native.

use insta::assert_snapshot;
use runmark::format::Format;
use runmark::formats::markdown::MarkdownFormat;
use runmark::model::{Attributes, CodeBlockInfo, ListKind, ListMarker, NativeTraits, RichText, Run};

fn md(runs: Vec<Run>) -> String {
    MarkdownFormat::default()
        .serialize(&RichText::from_runs(runs))
        .expect("markdown serialization never fails")
}

#[test]
fn test_emphasis_order_ignores_attribute_order() {
    let orders = [
        Attributes::plain().with_bold().with_italic().with_strike(),
        Attributes::plain().with_strike().with_italic().with_bold(),
        Attributes::plain().with_italic().with_strike().with_bold(),
    ];
    for attributes in orders {
        assert_eq!(md(vec![Run::new("text", attributes)]), "~~***text***~~");
    }
}

#[test]
fn test_native_traits_are_honored() {
    let native = NativeTraits {
        bold: true,
        link: Some("https://example.com".into()),
        ..Default::default()
    };
    assert_eq!(
        md(vec![Run::plain("x").with_native(native)]),
        "[**x**](https://example.com)"
    );
}

#[test]
fn test_semantic_link_wins_over_native_link() {
    let native = NativeTraits {
        link: Some("https://native.example".into()),
        ..Default::default()
    };
    let run = Run::new(
        "x",
        Attributes::plain().with_link(Some("https://semantic.example".into())),
    )
    .with_native(native);
    assert_eq!(md(vec![run]), "[x](https://semantic.example)");
}

#[test]
fn test_native_monospace_is_code() {
    let native = NativeTraits {
        monospace: true,
        italic: true,
        ..Default::default()
    };
    assert_eq!(md(vec![Run::plain("a_b").with_native(native)]), "`a_b`");
}

#[test]
fn test_plain_text_is_escaped() {
    assert_eq!(
        md(vec![Run::plain("2 * 3 = [six] (maybe) ~ `x`")]),
        "2 \\* 3 = \\[six\\] \\(maybe\\) \\~ \\`x\\`"
    );
}

#[test]
fn test_editor_document() {
    let list = |n| Attributes::plain().with_list_item(ListMarker::new(ListKind::Unordered, n));
    let runs = vec![
        Run::new("Notes", Attributes::plain().with_heading_level(1)),
        Run::plain("\nFirst line\nsecond "),
        Run::new("line", Attributes::plain().with_italic()),
        Run::plain("\n\n\n\n"),
        Run::new("alpha", list(1)),
        Run::new("\n", list(1)),
        Run::new("beta", list(2)),
        Run::new("\n", list(2)),
        Run::new("quoted", Attributes::plain().with_quote_depth(1)),
        Run::newline(),
        Run::new(
            "let x = 1;\n",
            Attributes::plain().with_code_block(CodeBlockInfo {
                language: Some("rust".into()),
                content: "let x = 1;\n".into(),
            }),
        ),
        Run::plain("The end."),
    ];

    assert_snapshot!(md(runs), @r"
    # Notes

    First line
    second *line*

    - alpha
    - beta

    > quoted

    ```rust
    let x = 1;
    ```

    The end.
    ");
}

#[test]
fn test_trailing_newline_follows_runs() {
    assert_eq!(md(vec![Run::plain("x\n")]), "x\n");
    assert_eq!(md(vec![Run::plain("x")]), "x");
    assert_eq!(md(vec![Run::plain("x\n\n\n")]), "x\n");
}
