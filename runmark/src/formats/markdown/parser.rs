//! Markdown parsing (Markdown → runs)
//!
//! Pipeline: Markdown string → Comrak AST → run sequence → quote-depth repair
//!
//! The walk threads an immutable [`Context`] through the recursion: entering a
//! node derives a modified copy for its children, and siblings never observe
//! each other's changes. The paragraph-id counter lives in the
//! [`RenderSession`] that owns the output, so rendering is a pure function of
//! the AST.

use crate::common::links::parse_destination;
use crate::common::quote_depth::repair_quote_depth;
use crate::model::{Attributes, CodeBlockInfo, ListKind, ListMarker, RichText, Run};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use std::borrow::Cow;

/// Knobs for the Markdown → runs direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Run the quote-depth normalizer after rendering the AST.
    pub repair_quote_depth: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            repair_quote_depth: true,
        }
    }
}

/// Parse Markdown into a run sequence with default options.
pub fn parse_from_markdown(source: &str) -> RichText {
    parse_from_markdown_with_options(source, &ParseOptions::default())
}

/// Parse Markdown into a run sequence.
pub fn parse_from_markdown_with_options(source: &str, options: &ParseOptions) -> RichText {
    let source = normalize_line_endings(source);

    let arena = Arena::new();
    let root = parse_document(&arena, &source, &comrak_options());
    let runs = render_ast(root, &source);

    if options.repair_quote_depth {
        repair_quote_depth(runs, &source)
    } else {
        runs
    }
}

/// Parse Markdown into runs without any structural repair.
///
/// This is the raw output of the AST walk, mostly useful for inspection.
pub fn parse_raw(source: &str) -> RichText {
    parse_from_markdown_with_options(
        source,
        &ParseOptions {
            repair_quote_depth: false,
        },
    )
}

pub(crate) fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options
}

pub(crate) fn normalize_line_endings(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Render a parsed Comrak AST into runs.
///
/// `source` is only consulted for its final newline: when it ends with one and
/// the produced runs do not, a literal newline run is appended.
pub fn render_ast<'a>(root: &'a AstNode<'a>, source: &str) -> RichText {
    let mut session = RenderSession::default();
    session.visit(root, &Context::default());

    let mut output = session.finish();
    if source.ends_with('\n') && !output.ends_with_newline() {
        output.push(Run::newline());
    }
    output
}

/// Attribute context in effect for a subtree.
#[derive(Debug, Clone, Default)]
struct Context {
    attributes: Attributes,
    quote_depth: usize,
}

impl Context {
    fn derive(&self, attributes: Attributes) -> Context {
        Context {
            attributes,
            quote_depth: self.quote_depth,
        }
    }

    fn nested_quote(&self) -> Context {
        let depth = self.quote_depth + 1;
        Context {
            attributes: self.attributes.with_quote_depth(depth),
            quote_depth: depth,
        }
    }
}

/// State owned by one AST walk.
#[derive(Debug, Default)]
struct RenderSession {
    next_paragraph_id: usize,
    output: RichText,
}

impl RenderSession {
    fn finish(self) -> RichText {
        self.output
    }

    fn allocate_paragraph_id(&mut self) -> usize {
        let id = self.next_paragraph_id;
        self.next_paragraph_id += 1;
        id
    }

    fn emit(&mut self, text: &str, ctx: &Context) {
        self.output.push(Run::new(text, ctx.attributes.clone()));
    }

    fn visit_children<'a>(&mut self, node: &'a AstNode<'a>, ctx: &Context) {
        for child in node.children() {
            self.visit(child, ctx);
        }
    }

    fn visit<'a>(&mut self, node: &'a AstNode<'a>, ctx: &Context) {
        let value = node.data.borrow().value.clone();

        match value {
            NodeValue::Text(text) => self.emit(&text, ctx),

            NodeValue::SoftBreak | NodeValue::LineBreak => self.emit("\n", ctx),

            NodeValue::Strong => {
                self.visit_children(node, &ctx.derive(ctx.attributes.with_bold()));
            }

            NodeValue::Emph => {
                self.visit_children(node, &ctx.derive(ctx.attributes.with_italic()));
            }

            NodeValue::Strikethrough => {
                self.visit_children(node, &ctx.derive(ctx.attributes.with_strike()));
            }

            NodeValue::Code(code) => {
                // Code content is verbatim, never walked
                self.emit(&code.literal, &ctx.derive(ctx.attributes.with_code()));
            }

            NodeValue::Link(link) => {
                let destination = parse_destination(&link.url);
                self.visit_children(node, &ctx.derive(ctx.attributes.with_link(destination)));
            }

            NodeValue::Heading(heading) => {
                self.visit_children(
                    node,
                    &ctx.derive(ctx.attributes.with_heading_level(heading.level)),
                );
            }

            NodeValue::List(list) => {
                let kind = match list.list_type {
                    ListType::Ordered => ListKind::Ordered,
                    ListType::Bullet => ListKind::Unordered,
                };
                self.visit_list(node, kind, ctx);
            }

            NodeValue::BlockQuote => {
                let quoted = ctx.nested_quote();
                for child in node.children() {
                    self.visit(child, &quoted);
                }
            }

            NodeValue::CodeBlock(block) => {
                let info = block.info.trim();
                let language = (!info.is_empty()).then(|| info.to_string());
                let content = block.literal.clone();
                let text = if content.is_empty() {
                    "\n".to_string()
                } else {
                    content.clone()
                };
                let attributes = ctx
                    .attributes
                    .with_code_block(CodeBlockInfo { language, content });
                self.output.push(Run::new(text, attributes));
            }

            // Inline tags are kept as literal text; HTML blocks are dropped
            NodeValue::HtmlInline(literal) => self.emit(&literal, ctx),

            NodeValue::Paragraph => {
                let id = self.allocate_paragraph_id();
                self.visit_children(node, &ctx.derive(ctx.attributes.with_paragraph_id(id)));
            }

            _ => self.visit_children(node, ctx),
        }
    }

    fn visit_list<'a>(&mut self, node: &'a AstNode<'a>, kind: ListKind, ctx: &Context) {
        let items = node
            .children()
            .filter(|child| matches!(child.data.borrow().value, NodeValue::Item(_)));

        for (index, item) in items.enumerate() {
            let marker = ListMarker::new(kind, index + 1);
            let item_ctx = ctx.derive(ctx.attributes.with_list_item(marker));
            self.visit_children(item, &item_ctx);
            // The separator belongs to the list, not to a blank line
            self.emit("\n", &item_ctx);
        }
    }
}
