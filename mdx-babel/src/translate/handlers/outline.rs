//! API descriptions (`desc_*` nodes) as the `Outline` component family.
//!
//! A `desc` collects facts about the described object in its scope (target id, module,
//! full name, parameter names, first paragraph of the description) and writes them onto
//! the `<Outline>` element when it is closed. Parameter separators follow the usual
//! signature layout: required parameters are separated as they are emitted, optional
//! ones are bracketed and separated from inside the bracket.

use super::close;
use crate::error::TranslateError;
use crate::ir::nodes::{Element, Node};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Departure, Handler, HandlerTable, Translator, Visit};
use serde_json::Value;

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Desc, Handler::new(desc_enter, desc_leave));
    table.register(NodeKind::DescSignature, Handler::new(signature_enter, close));
    table.register(
        NodeKind::DescSignatureLine,
        Handler::new(signature_line_enter, close),
    );
    table.register(NodeKind::DescName, OUTLINE_TEXT);
    table.register(NodeKind::DescAddname, OUTLINE_TEXT);
    table.register(NodeKind::DescAnnotation, OUTLINE_TEXT);
    table.register(NodeKind::DescType, OUTLINE_TEXT);
    table.register(NodeKind::DescInline, OUTLINE_TEXT);
    table.register(
        NodeKind::DescParameterlist,
        Handler::new(parameterlist_enter, parameterlist_leave),
    );
    table.register(
        NodeKind::DescParameter,
        Handler::new(parameter_enter, parameter_leave),
    );
    table.register(
        NodeKind::DescOptional,
        Handler::new(optional_enter, optional_leave),
    );
    table.register(NodeKind::DescReturns, Handler::new(returns_enter, close));
    table.register(NodeKind::DescContent, Handler::new(content_enter, close));
    table.register(NodeKind::DescSigElement, Handler::new(sig_element_enter, close));
    table.register(NodeKind::DescSigSpace, Handler::enter_only(sig_space_enter));
}

fn desc_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let outline = Element::flow("Outline")
        .with_optional_attr("domain", node.str_attr("domain"))
        .with_optional_attr("objectType", node.str_attr("desctype"));
    t.enter_nesting(node, outline);
    t.contextualize(node, Vec::new());
    t.set_context("parameters", Value::Array(Vec::new()));
    Ok(Visit::Descend)
}

fn desc_leave<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Departure, TranslateError> {
    let mut facts: Vec<(String, Value)> = t
        .scope_data(node)
        .map(|data| data.clone().into_iter().collect())
        .unwrap_or_default();
    facts.sort_by(|(a, _), (b, _)| a.cmp(b));
    t.leave_nesting_with(node, |markup| {
        if let Some(element) = markup.element_mut() {
            for (key, value) in facts {
                element.attributes.set(key, value);
            }
        }
    });
    Ok(Departure::Done)
}

fn signature_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let fullname = node.str_attr("fullname");
    t.enter_nesting(
        node,
        Element::flow("Outline.Signature").with_optional_attr("fullname", fullname),
    );
    for (key, value) in [
        ("target", node.primary_id()),
        ("module", node.str_attr("module")),
        ("fullname", fullname),
    ] {
        if let Some(value) = value {
            t.set_context(key, value);
        }
    }
    Ok(Visit::Descend)
}

fn signature_line_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Node::paragraph(Vec::new()));
    Ok(Visit::Descend)
}

/// Inline component for the simple signature parts.
fn outline_text_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let element = match node.kind {
        NodeKind::DescName => Element::text("Outline.Name"),
        NodeKind::DescAddname => Element::text("Outline.Prefix"),
        NodeKind::DescAnnotation => Element::text("Outline.Keyword"),
        NodeKind::DescType => Element::text("Outline.TypeAnnotation"),
        NodeKind::DescInline => Element::text("code"),
        _ => return Ok(Visit::Pass),
    };
    t.enter_nesting(node, element);
    Ok(Visit::Descend)
}

const OUTLINE_TEXT: Handler = Handler::new(outline_text_enter, close);

fn punctuation(text: &str) -> Node {
    Element::text("span").with_child(Node::text(text)).into()
}

fn parameterlist_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("Outline.ParameterList"));
    t.append_child(None, punctuation("("));

    let required = node
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::DescParameter)
        .count();
    let separator = node.str_attr("child_text_separator").unwrap_or(", ");

    t.contextualize(node, Vec::new());
    t.set_context("first_param", true);
    t.set_context("required_params_left", required);
    t.set_context("optional_param_level", 0);
    t.set_context("param_separator", separator);
    Ok(Visit::Descend)
}

fn parameterlist_leave<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    t.append_child(None, punctuation(")"));
    t.leave_nesting(node);
    Ok(Departure::Done)
}

fn counter(t: &Translator<'_>, key: &str) -> i64 {
    t.context(key).and_then(Value::as_i64).unwrap_or(0)
}

fn set_counter(t: &mut Translator<'_>, key: &str, value: i64) {
    if let Some(slot) = t.context_mut(key) {
        *slot = Value::from(value);
    }
}

fn separator(t: &Translator<'_>) -> Node {
    Node::text(t.context_str("param_separator").unwrap_or(", "))
}

fn parameter_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    if t.context("first_param") == Some(&Value::Bool(true)) {
        if let Some(first) = t.context_mut("first_param") {
            *first = Value::Bool(false);
        }
    } else if counter(t, "required_params_left") == 0 {
        let separator = separator(t);
        t.append_child(None, separator);
    }
    if counter(t, "optional_param_level") == 0 {
        let left = counter(t, "required_params_left");
        set_counter(t, "required_params_left", left - 1);
    }

    if let Some(name) = node.find(&NodeKind::DescSigName) {
        if let Some(Value::Array(parameters)) = t.context_mut("parameters") {
            parameters.push(Value::from(name.astext()));
        }
    }

    t.enter_nesting(node, Element::text("Outline.Parameter"));
    Ok(Visit::Descend)
}

fn parameter_leave<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    t.leave_nesting(node);
    if counter(t, "required_params_left") > 0 {
        let separator = separator(t);
        t.append_child(None, separator);
    }
    Ok(Departure::Done)
}

fn optional_enter<'a>(t: &mut Translator<'a>, _node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let level = counter(t, "optional_param_level");
    set_counter(t, "optional_param_level", level + 1);
    t.append_child(None, Node::text("["));
    Ok(Visit::Descend)
}

fn optional_leave<'a>(
    t: &mut Translator<'a>,
    _node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    let level = counter(t, "optional_param_level");
    set_counter(t, "optional_param_level", level - 1);
    t.append_child(None, Node::text("]"));
    Ok(Departure::Done)
}

fn returns_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("Outline.ReturnType"));
    t.append_child(
        None,
        Element::text("span").with_child(Node::json(&Value::from(" → "))),
    );
    Ok(Visit::Descend)
}

/// The description body. Inside its `Parameters` field, bold literals name parameters.
fn content_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::flow("Outline.Content"));
    if let Some(description) = node.find(&NodeKind::Paragraph) {
        t.set_context("description", description.astext());
    }
    t.contextualize(
        node,
        vec![(
            NodeKind::LiteralStrong,
            Handler::new(parameter_target_enter, parameter_target_leave),
        )],
    );
    Ok(Visit::Descend)
}

fn parameter_target_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    if t.context_str("field_section") != Some("Parameters") {
        return Ok(Visit::Pass);
    }
    t.enter_nesting(node, Element::text("Outline.ParameterTarget"));
    Ok(Visit::Descend)
}

fn parameter_target_leave<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    if t.leave_nesting(node) {
        Ok(Departure::Done)
    } else {
        Ok(Departure::Pass)
    }
}

fn sig_element_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let span = Element::text("span");
    let span = match node.kind {
        NodeKind::DescSigName => span.with_class("name"),
        _ => span,
    };
    t.enter_nesting(node, span);
    Ok(Visit::Descend)
}

fn sig_space_enter<'a>(t: &mut Translator<'a>, _node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.append_child(
        None,
        Element::text("span").with_child(Node::json(&Value::from(" "))),
    );
    Ok(Visit::Skip)
}
