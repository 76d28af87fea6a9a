//! The standard handler catalogue.
//!
//! Each submodule registers the handlers for one family of source kinds. Kinds that map
//! one-to-one onto a component element share [`WRAP`], driven by [`wrapper`].

mod admonitions;
mod inline;
mod lists;
mod outline;
mod raw;
mod references;
mod structure;
mod tables;

use super::dispatch::{Departure, Handler, HandlerTable, Visit};
use super::Translator;
use crate::error::TranslateError;
use crate::ir::nodes::Element;
use crate::source::{NodeKind, SourceNode};

pub(crate) fn register_standard(table: &mut HandlerTable) {
    table.register(NodeKind::Element, Handler::enter_only(generic_enter));
    for kind in SKIPPED {
        table.register(kind.clone(), Handler::enter_only(skip));
    }
    for kind in WRAPPED {
        table.register(kind.clone(), WRAP);
    }

    structure::register(table);
    lists::register(table);
    inline::register(table);
    references::register(table);
    admonitions::register(table);
    tables::register(table);
    outline::register(table);
    raw::register(table);
}

/// Kinds that produce no output at all.
const SKIPPED: &[NodeKind] = &[
    NodeKind::Comment,
    NodeKind::SubstitutionDefinition,
    NodeKind::Toctree,
    NodeKind::Index,
    NodeKind::SystemMessage,
    NodeKind::Label,
];

const WRAPPED: &[NodeKind] = &[
    NodeKind::Subtitle,
    NodeKind::Rubric,
    NodeKind::Attribution,
    NodeKind::LineBlock,
    NodeKind::Line,
    NodeKind::Figure,
    NodeKind::Caption,
    NodeKind::Legend,
    NodeKind::Sidebar,
    NodeKind::Subscript,
    NodeKind::Superscript,
    NodeKind::TitleReference,
    NodeKind::FieldBody,
    NodeKind::Description,
    NodeKind::Hlistcol,
];

/// Component element for kinds that translate to a single element.
fn wrapper(node: &SourceNode) -> Option<Element> {
    let element = match node.kind {
        NodeKind::Subtitle => Element::flow("p").with_class("sidebar-subtitle"),
        NodeKind::Rubric => Element::flow("p").with_class("sidebar-rubric"),
        NodeKind::Attribution => Element::flow("p").with_class("attribution"),
        NodeKind::LineBlock => Element::flow("div").with_class("line-block"),
        NodeKind::Line => Element::flow("div").with_class("line"),
        NodeKind::Figure => Element::flow("figure"),
        NodeKind::Caption => Element::flow("figcaption"),
        NodeKind::Legend => Element::flow("div").with_class("legend"),
        NodeKind::Sidebar => Element::flow("aside"),
        NodeKind::Subscript => Element::text("sub"),
        NodeKind::Superscript => Element::text("sup"),
        NodeKind::TitleReference => Element::text("cite"),
        NodeKind::FieldBody => Element::flow("dd").with_class("field-body"),
        NodeKind::Description => Element::flow("dd"),
        NodeKind::Hlistcol => Element::flow("td"),
        _ => return None,
    };
    Some(element)
}

fn wrap_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    match wrapper(node) {
        Some(element) => {
            t.enter_nesting(node, element);
            Ok(Visit::Descend)
        }
        None => Ok(Visit::Pass),
    }
}

const WRAP: Handler = Handler::new(wrap_enter, close);

/// Unknown kinds: report and translate the children in place.
fn generic_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.warn(node, "unknown node kind, translating children only");
    Ok(Visit::Descend)
}

pub(super) fn descend<'a>(
    _t: &mut Translator<'a>,
    _node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    Ok(Visit::Descend)
}

pub(super) fn skip<'a>(
    _t: &mut Translator<'a>,
    _node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    Ok(Visit::Skip)
}

/// Closes the frame the node opened on enter, if any.
pub(super) fn close<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    t.leave_nesting(node);
    Ok(Departure::Done)
}

/// Closes every frame the node opened on enter.
pub(super) fn close_all<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    t.leave_all(node);
    Ok(Departure::Done)
}
