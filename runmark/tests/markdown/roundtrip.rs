//! Round-trip tests (Markdown → runs → Markdown)
//!
//! Canonical Markdown must come back byte for byte. Everything else must come
//! back canonical, after which it is stable.

use crate::common::{fixture, round_trip};
use runmark::model::{RichText, Run};

#[track_caller]
fn assert_stable(source: &str) {
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_kitchensink_is_stable() {
    assert_stable(&fixture("kitchensink.md"));
}

#[test]
fn test_canonical_blocks_are_stable() {
    assert_stable("# Title\n");
    assert_stable("###### Deep\n\nBody\n");
    assert_stable("Para one.\n\nPara two.\n");
    assert_stable("line one\nline two\n");
    assert_stable("- a\n- b\n");
    assert_stable("1. a\n2. b\n\nAfter the list.\n");
    assert_stable("> quoted\n> still quoted\n");
    assert_stable("```\nplain code\n```\n");
    assert_stable("```\n```\n");
    assert_stable("No trailing newline");
}

#[test]
fn test_crlf_is_normalized() {
    assert_eq!(round_trip("# T\r\n\r\nBody\r\n"), "# T\n\nBody\n");
}

#[test]
fn test_ordered_list_is_renumbered() {
    assert_eq!(round_trip("3. third\n4. fourth\n"), "1. third\n2. fourth\n");
}

#[test]
fn test_inline_code_fence_grows_past_internal_backticks() {
    assert_stable("``code`tick``");
    assert_stable("use `` `tick `` here\n");
}

#[test]
fn test_code_block_fence_grows_past_internal_fences() {
    assert_stable("````md\n```\nnested\n```\n````\n");
}

#[test]
fn test_nested_quote_survives() {
    assert_stable("> Outer\n> > Inner\n> Back to outer\n");
}

#[test]
fn test_adjacent_quotes_have_no_blank_line_between() {
    assert_stable("> a\n> > b\n> > > c\n");
}

#[test]
fn test_bare_quote_separator_between_depths_survives() {
    for source in ["> > a\n>\n> b\n", "> a\n> > b\n>\n> c\n"] {
        let once = round_trip(source);
        assert_eq!(once, source);
        assert_eq!(round_trip(&once), once, "not stable for {source:?}");
    }
}

#[test]
fn test_bare_quote_separator_at_same_depth_survives() {
    assert_stable("> a\n>\n> b\n");
    assert_stable("> a\n> > b\n> > c\n>\n> d\n");
}

#[test]
fn test_combined_emphasis_order() {
    assert_stable("~~***text***~~\n");
    assert_stable("**bold *inner* bold**\n");
}

#[test]
fn test_three_newline_gap_is_capped_at_two() {
    assert_eq!(round_trip("A\n\n\nB\n"), "A\n\nB\n");
}

#[test]
fn test_escaped_text_is_stable() {
    assert_stable("\\* \\_ \\[ \\] \\` \\~ \\\\\n");
    assert_stable("\\# not a heading\n");
    assert_stable("\\- not a list\n");
    assert_stable("1\\. not a list either\n");
}

#[test]
fn test_text_that_looks_like_html_survives() {
    let runs = RichText::from_runs(vec![Run::plain("plain <div> and a < b")]);
    let markdown = runmark::render(&runs);
    assert_eq!(markdown, "plain \\<div> and a < b");
    assert_eq!(runmark::parse(&markdown).plain_text(), "plain <div> and a < b");
}

#[test]
fn test_inline_html_converges_to_escaped_text() {
    assert_eq!(round_trip("plain <b>x</b>\n"), "plain \\<b>x\\</b>\n");
    assert_stable("plain \\<b>x\\</b>\n");
    assert_stable("\\<https://example.com>\n");
}

#[test]
fn test_links_are_stable() {
    assert_stable("[text](https://example.com/path?q=1)\n");
    assert_stable("[relative](docs/page.md) and [anchor](#top)\n");
    assert_stable("[paren](https://en.wikipedia.org/wiki/Rust_\\(language\\))\n");
    assert_stable("[go **now**](https://example.com) and [*all* of it](https://example.com)\n");
}

#[test]
fn test_non_canonical_input_converges() {
    let inputs = [
        "__strong__ and _em_\n",
        "* star\n* list\n",
        "~~~\ncode\n~~~\n",
        "- loose\n\n- list\n",
        "> one\n\n> two\n",
        "hard  \nbreak\n",
        "Setext\n======\n",
    ];
    for input in inputs {
        let once = round_trip(input);
        assert_eq!(round_trip(&once), once, "not stable for {input:?}");
    }
}

#[test]
fn test_non_canonical_input_canonical_forms() {
    assert_eq!(round_trip("__strong__ and _em_\n"), "**strong** and *em*\n");
    assert_eq!(round_trip("* star\n* list\n"), "- star\n- list\n");
    assert_eq!(round_trip("~~~\ncode\n~~~\n"), "```\ncode\n```\n");
    assert_eq!(round_trip("Setext\n======\n"), "# Setext\n");
}
