//! Import tests for Markdown format (Markdown → runs)
//!
//! These tests check the run sequence produced by the AST walk and the quote
//! depth repair, and the blocks the collector groups them into.

use crate::common::{block_kinds, fixture, text_depths};
use insta::assert_snapshot;
use runmark::common::collect::collect_blocks;
use runmark::formats::markdown::parser::{parse_from_markdown, parse_raw};
use runmark::formats::treeviz::to_treeviz_str;
use runmark::model::ListKind;

#[test]
fn test_nested_quote_keeps_three_depths() {
    let runs = parse_from_markdown("> Outer\n> > Inner\n> Back to outer\n");
    assert_eq!(text_depths(&runs), vec![Some(1), Some(2), Some(1)]);
    assert_eq!(runs.plain_text(), "Outer\nInner\nBack to outer\n");
}

#[test]
fn test_raw_parse_collapses_depth_decrease() {
    // The lazy continuation line is folded into the inner quote
    let runs = parse_raw("> Outer\n> > Inner\n> Back to outer\n");
    assert_eq!(text_depths(&runs), vec![Some(1), Some(2)]);
}

#[test]
fn test_quote_repair_keeps_inline_styling() {
    let runs = parse_from_markdown("> **Outer**\n> > Inner\n> Back\n");
    assert_eq!(text_depths(&runs), vec![Some(1), Some(2), Some(1)]);
    let outer = runs.iter().find(|run| run.text == "Outer").unwrap();
    assert!(outer.attributes.bold);
}

#[test]
fn test_quote_without_depth_drop_is_left_alone() {
    let source = "> one\n> two\n\nafter\n";
    let runs = parse_from_markdown(source);
    assert_eq!(runs, parse_raw(source));
}

#[test]
fn test_paragraphs_get_distinct_ids() {
    let runs = parse_from_markdown("one **two**\n\nthree\n");
    let ids: Vec<_> = runs
        .iter()
        .map(|run| run.attributes.paragraph_id)
        .collect();
    assert_eq!(ids, vec![Some(0), Some(0), Some(1), None]);
}

#[test]
fn test_list_items_inside_quote() {
    let runs = parse_from_markdown("> - a\n> - b\n");
    let tagged: Vec<_> = runs
        .iter()
        .filter(|run| !run.is_newline_only())
        .map(|run| (run.attributes.quote_depth, run.attributes.list_item.map(|m| m.kind)))
        .collect();
    assert_eq!(
        tagged,
        vec![
            (Some(1), Some(ListKind::Unordered)),
            (Some(1), Some(ListKind::Unordered))
        ]
    );
}

#[test]
fn test_tilde_fence_is_a_code_block() {
    let runs = parse_from_markdown("~~~python\nprint(1)\n~~~\n");
    let info = runs.runs[0].attributes.code_block.as_ref().unwrap();
    assert_eq!(info.language.as_deref(), Some("python"));
    assert_eq!(info.content, "print(1)\n");
}

#[test]
fn test_unrecognized_nodes_contribute_children_only() {
    let runs = parse_from_markdown("an ![image](pic.png) and <b>html</b>\n");
    assert_eq!(runs.plain_text(), "an image and html\n");
    assert!(runs.iter().all(|run| run.attributes.link.is_none()));
}

#[test]
fn test_heading_then_paragraph_blocks() {
    let runs = parse_from_markdown("## Section\n\nBody\n");
    assert_eq!(
        block_kinds(&collect_blocks(&runs)),
        vec!["heading", "paragraph"]
    );
}

#[test]
fn test_kitchensink_blocks() {
    let runs = parse_from_markdown(&fixture("kitchensink.md"));
    let tree = to_treeviz_str(&collect_blocks(&runs), false);

    assert_snapshot!(tree, @r#"
    ⧉ 10 blocks
    ├─ § h1 Kitchen Sink
    ├─ ¶ A paragraph with bold, italic…
    ├─ § h2 Lists
    ├─ ☰ unordered, 3 items
    │ ├─ • first
    │ ├─ • second with bold
    │ └─ • third
    ├─ ☰ ordered, 2 items
    │ ├─ • one
    │ └─ • two
    ├─ " depth 1, 1 line
    │ └─ ↵ A quote
    ├─ " depth 2, 1 line
    │ └─ ↵ Nested
    ├─ " depth 1, 1 line
    │ └─ ↵ Back out
    ├─ 𝒱 rust, 3 lines
    └─ ¶ Final paragraph with escaped …
    "#);
}
