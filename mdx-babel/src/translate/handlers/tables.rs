//! Grid and simple tables.

use super::{close, descend};
use crate::error::TranslateError;
use crate::ir::nodes::{Cell, Column, Node, Row, Table};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Handler, HandlerTable, Markup, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Table, Handler::new(table_enter, close));
    table.register(NodeKind::Tgroup, Handler::enter_only(descend));
    table.register(NodeKind::Colspec, Handler::enter_only(colspec_enter));
    table.register(NodeKind::Thead, Handler::enter_only(thead_enter));
    table.register(NodeKind::Tbody, Handler::enter_only(tbody_enter));
    table.register(NodeKind::Row, Handler::new(row_enter, close));
    table.register(NodeKind::Entry, Handler::new(entry_enter, close));
}

fn table_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Node::Table(Table::default()));
    Ok(Visit::Descend)
}

fn colspec_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let column = Column {
        width: node.f64_attr("colwidth"),
    };
    match t
        .find_markup_mut(|markup| matches!(markup, Markup::Node(Node::Table(_))))
        .and_then(Markup::table_mut)
    {
        Some(table) => table.columns.push(column),
        None => t.warn(node, "column spec outside of a table"),
    }
    Ok(Visit::Skip)
}

fn thead_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.contextualize(node, Vec::new());
    t.set_context("table_section", "head");
    Ok(Visit::Descend)
}

fn tbody_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.contextualize(node, Vec::new());
    t.set_context("table_section", "body");
    Ok(Visit::Descend)
}

fn row_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let header = t.context_str("table_section") == Some("head");
    t.enter_nesting(
        node,
        Row {
            header,
            cells: Vec::new(),
        },
    );
    Ok(Visit::Descend)
}

fn entry_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let span = |key| node.u32_attr(key).unwrap_or(0).saturating_add(1);
    let cell = Cell {
        col_span: span("morecols"),
        row_span: span("morerows"),
        children: Vec::new(),
    };
    t.enter_nesting(node, cell);
    Ok(Visit::Descend)
}
