//! Property-based round-trip tests
//!
//! Documents are generated in canonical form (the shape the serializer
//! emits), so the round trip must return them byte for byte, and a second
//! round trip must not change anything.

use proptest::prelude::*;
use runmark::model::{RichText, Run};
use runmark::{parse, render};

/// One canonical block, as Markdown source.
#[derive(Debug, Clone)]
enum BlockSource {
    Heading(String),
    Paragraph(String),
    List(String),
    Quote(String),
    Code(String),
}

impl BlockSource {
    fn text(&self) -> &str {
        match self {
            BlockSource::Heading(text)
            | BlockSource::Paragraph(text)
            | BlockSource::List(text)
            | BlockSource::Quote(text)
            | BlockSource::Code(text) => text,
        }
    }

    /// Two lists or two quotes in a row merge (or renumber) on the way back.
    fn merges_with(&self, previous: &BlockSource) -> bool {
        matches!(
            (previous, self),
            (BlockSource::List(_), BlockSource::List(_))
                | (BlockSource::Quote(_), BlockSource::Quote(_))
        )
    }
}

fn gen_word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn gen_styled_word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => gen_word(),
        1 => gen_word().prop_map(|w| format!("*{w}*")),
        1 => gen_word().prop_map(|w| format!("**{w}**")),
        1 => gen_word().prop_map(|w| format!("~~{w}~~")),
        1 => gen_word().prop_map(|w| format!("`{w}`")),
        1 => gen_word().prop_map(|w| format!("[{w}](https://example.com/{w})")),
    ]
}

fn gen_plain_line() -> impl Strategy<Value = String> {
    prop::collection::vec(gen_word(), 1..4).prop_map(|words| words.join(" "))
}

fn gen_inline_line() -> impl Strategy<Value = String> {
    prop::collection::vec(gen_styled_word(), 1..6).prop_map(|words| words.join(" "))
}

fn gen_heading() -> impl Strategy<Value = BlockSource> {
    (1usize..=6, gen_inline_line())
        .prop_map(|(level, line)| BlockSource::Heading(format!("{} {line}", "#".repeat(level))))
}

fn gen_list() -> impl Strategy<Value = BlockSource> {
    (any::<bool>(), prop::collection::vec(gen_inline_line(), 1..4)).prop_map(|(ordered, items)| {
        let lines: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if ordered {
                    format!("{}. {item}", index + 1)
                } else {
                    format!("- {item}")
                }
            })
            .collect();
        BlockSource::List(lines.join("\n"))
    })
}

/// A quote of plain lines at depths 1 to 3, with bare `>` separators.
///
/// A separator takes the depth of the line after it and only appears before
/// a line at the same or a lower depth: one in front of a deeper line is
/// swallowed by the nested quote.
fn gen_nested_quote() -> impl Strategy<Value = BlockSource> {
    prop::collection::vec((1usize..=3, any::<bool>(), gen_plain_line()), 1..6).prop_map(
        |lines| {
            let mut out: Vec<String> = Vec::new();
            let mut previous: Option<usize> = None;
            for (depth, separated, text) in lines {
                let marker = "> ".repeat(depth);
                if separated && previous.is_some_and(|previous| depth <= previous) {
                    out.push(marker.trim_end().to_string());
                }
                out.push(format!("{marker}{text}"));
                previous = Some(depth);
            }
            BlockSource::Quote(out.join("\n"))
        },
    )
}

fn gen_code() -> impl Strategy<Value = BlockSource> {
    (
        prop::option::of("[a-z]{1,6}"),
        prop::collection::vec("[a-z][a-z ]{0,10}", 0..3),
    )
        .prop_map(|(language, lines)| {
            let mut block = format!("```{}\n", language.unwrap_or_default());
            for line in lines {
                block.push_str(&line);
                block.push('\n');
            }
            block.push_str("```");
            BlockSource::Code(block)
        })
}

fn gen_block() -> impl Strategy<Value = BlockSource> {
    prop_oneof![
        gen_heading(),
        gen_inline_line().prop_map(BlockSource::Paragraph),
        gen_list(),
        gen_inline_line().prop_map(|line| BlockSource::Quote(format!("> {line}"))),
        gen_nested_quote(),
        gen_code(),
    ]
}

fn gen_canonical_doc() -> impl Strategy<Value = String> {
    prop::collection::vec(gen_block(), 1..7).prop_map(|blocks| {
        let mut kept: Vec<BlockSource> = Vec::new();
        for block in blocks {
            if kept.last().is_some_and(|previous| block.merges_with(previous)) {
                continue;
            }
            kept.push(block);
        }
        let texts: Vec<&str> = kept.iter().map(BlockSource::text).collect();
        format!("{}\n", texts.join("\n\n"))
    })
}

/// Plain text full of characters Markdown would otherwise interpret.
fn gen_markup_heavy_text() -> impl Strategy<Value = String> {
    "[a-z \\\\*_\\[\\]()`~#<>+=!/.-]{1,24}"
        .prop_filter("no surrounding whitespace", |text| text.trim() == text)
}

#[test]
fn test_nested_quote_shapes_round_trip() {
    for source in [
        "> > a\n> b\n> > c\n",
        "> a\n> > b\n> >\n> > c\n> d\n",
        "> > > a\n>\n> b\n",
        "> > a\n> >\n> > b\n> c\n",
    ] {
        assert_eq!(render(&parse(source)), source);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_canonical_documents_round_trip(source in gen_canonical_doc()) {
        prop_assert_eq!(render(&parse(&source)), source);
    }

    #[test]
    fn test_round_trip_is_idempotent(source in gen_canonical_doc()) {
        let once = render(&parse(&source));
        let twice = render(&parse(&once));
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_plain_text_survives_escaping(text in gen_markup_heavy_text()) {
        let runs = RichText::from_runs(vec![Run::plain(text.clone())]);
        let markdown = render(&runs);
        let parsed = parse(&markdown);
        prop_assert_eq!(parsed.plain_text(), text);
        prop_assert_eq!(render(&parsed), markdown);
    }
}
