//! Bullet, enumerated, definition, field and option lists.

use super::{close, close_all, descend};
use crate::error::TranslateError;
use crate::ir::nodes::{Element, List, ListItem, Node};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Handler, HandlerTable, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::BulletList, Handler::new(bullet_list_enter, close));
    table.register(NodeKind::EnumeratedList, Handler::new(enumerated_list_enter, close));
    table.register(NodeKind::ListItem, Handler::new(list_item_enter, close));

    table.register(NodeKind::DefinitionList, Handler::new(definition_list_enter, close_all));
    table.register(
        NodeKind::DefinitionListItem,
        Handler::new(definition_list_item_enter, close),
    );
    table.register(NodeKind::Term, Handler::new(term_enter, close_all));
    table.register(NodeKind::Classifier, Handler::new(classifier_enter, close));
    table.register(NodeKind::Definition, Handler::new(definition_enter, close));

    table.register(NodeKind::FieldList, Handler::new(field_list_enter, close_all));
    table.register(NodeKind::Field, Handler::enter_only(descend));
    table.register(NodeKind::FieldName, Handler::new(field_name_enter, close));

    table.register(NodeKind::OptionList, Handler::new(option_list_enter, close_all));
    table.register(NodeKind::OptionListItem, Handler::enter_only(descend));
    table.register(NodeKind::OptionGroup, Handler::enter_only(option_group_enter));
}

fn bullet_list_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Node::List(List::unordered()));
    Ok(Visit::Descend)
}

fn enumerated_list_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Node::List(List::ordered(node.u32_attr("start"))));
    Ok(Visit::Descend)
}

fn list_item_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, ListItem::default());
    Ok(Visit::Descend)
}

/// Opens a component wrapping a plain `<dl>`; both frames close together.
fn enter_dl<'a>(t: &mut Translator<'a>, node: &'a SourceNode, component: &str) {
    t.enter_nesting(node, Element::flow(component));
    t.enter_nesting_anchored(node, Element::flow("dl"), None);
}

fn definition_list_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    enter_dl(t, node, "DefinitionList");
    Ok(Visit::Descend)
}

/// The item owns the `<dt>`; its definition closes it, or the item does when there is
/// none.
fn definition_list_item_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::flow("dt"));
    Ok(Visit::Descend)
}

fn term_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("DefinitionList.Term"));
    t.enter_nesting_anchored(node, Element::text("span"), None);
    Ok(Visit::Descend)
}

fn classifier_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("em").with_class("classifier"));
    t.append_child(None, Node::text(" : "));
    Ok(Visit::Descend)
}

fn definition_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    if let Some(item) = t.parent() {
        t.leave_nesting(item);
    }
    t.enter_nesting(node, Element::flow("dd"));
    Ok(Visit::Descend)
}

fn field_list_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    enter_dl(t, node, "FieldList");
    t.contextualize(node, Vec::new());
    Ok(Visit::Descend)
}

/// Records the field name so handlers inside the body can tell which section they are in.
fn field_name_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.set_context("field_section", node.astext());
    t.enter_nesting(node, Element::flow("dt").with_class("field-name"));
    Ok(Visit::Descend)
}

fn option_list_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    enter_dl(t, node, "OptionList");
    Ok(Visit::Descend)
}

fn option_group_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let options = node
        .children
        .iter()
        .map(SourceNode::astext)
        .collect::<Vec<_>>()
        .join(", ");
    let dt = Element::flow("dt").with_child(Node::inline_code(options));
    t.append_child(Some(node), dt);
    Ok(Visit::Skip)
}
