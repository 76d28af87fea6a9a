//! Phrasing content: emphasis, code, semantic inline markup and math.

use super::close;
use crate::error::TranslateError;
use crate::ir::nodes::{Element, Node};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Handler, HandlerTable, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Strong, Handler::new(strong_enter, close));
    table.register(NodeKind::Emphasis, Handler::new(emphasis_enter, close));
    table.register(NodeKind::Literal, Handler::enter_only(literal_enter));
    table.register(NodeKind::Inline, Handler::new(inline_enter, close));
    table.register(NodeKind::Abbreviation, Handler::new(abbreviation_enter, close));
    table.register(NodeKind::Problematic, Handler::new(problematic_enter, close));
    table.register(NodeKind::Math, Handler::enter_only(math_enter));
    table.register(NodeKind::MathBlock, Handler::enter_only(math_block_enter));
}

fn strong_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(
        node,
        Node::Strong {
            children: Vec::new(),
        },
    );
    Ok(Visit::Descend)
}

fn emphasis_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(
        node,
        Node::Emphasis {
            children: Vec::new(),
        },
    );
    Ok(Visit::Descend)
}

/// Inline literals: code spans, keyboard input, or the label of a download link.
fn literal_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let text = node.astext();
    let markup: Node = if let Some(language) = node.str_attr("language") {
        Element::text("code")
            .with_attr("data-language", language)
            .with_child(Node::text(text))
            .into()
    } else if node.has_class("kbd") {
        Element::text("kbd").with_child(Node::text(text)).into()
    } else if node.has_class("download") {
        Node::text(text)
    } else {
        Node::inline_code(text)
    };
    t.append_child(Some(node), markup);
    Ok(Visit::Skip)
}

fn inline_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let classes = node.classes().collect::<Vec<_>>();
    if !classes.is_empty() {
        t.enter_nesting(node, Element::text("span").with_attr("className", classes.join(" ")));
    }
    Ok(Visit::Descend)
}

fn abbreviation_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let abbr = Element::text("abbr").with_optional_attr("title", node.str_attr("explanation"));
    t.enter_nesting(node, abbr);
    Ok(Visit::Descend)
}

fn problematic_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("del"));
    Ok(Visit::Descend)
}

fn math_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let math = Element::text("InlineMath").with_attr("math", node.astext());
    t.append_child(Some(node), math);
    Ok(Visit::Skip)
}

fn math_block_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let math = Element::flow("Math").with_attr("math", node.astext());
    t.append_child(Some(node), math);
    Ok(Visit::Skip)
}
