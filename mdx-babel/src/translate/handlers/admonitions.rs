//! Admonitions, topics and version notes, all rendered as `<Container>`.

use super::close;
use crate::error::TranslateError;
use crate::ir::nodes::Element;
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Departure, Handler, HandlerTable, Translator, Visit};
use serde_json::Value;

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Admonition, Handler::new(admonition_enter, admonition_leave));
    table.register(NodeKind::Seealso, Handler::new(seealso_enter, admonition_leave));
    table.register(NodeKind::Topic, Handler::new(topic_enter, admonition_leave));
    table.register(
        NodeKind::Versionmodified,
        Handler::new(versionmodified_enter, close),
    );
}

fn container(kind: &str, title: Option<&str>) -> Element {
    Element::flow("Container")
        .with_attr("type", kind)
        .with_optional_attr("title", title)
}

/// Opens the container together with a scope that a child title can write into.
fn enter_container<'a>(t: &mut Translator<'a>, node: &'a SourceNode, element: Element) {
    t.enter_nesting(node, element);
    t.contextualize(node, Vec::new());
}

fn admonition_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let element = container(node.kind.as_str(), node.str_attr("title"));
    enter_container(t, node, element);
    Ok(Visit::Descend)
}

fn seealso_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    enter_container(t, node, container("info", Some("See also:")));
    Ok(Visit::Descend)
}

fn topic_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    enter_container(t, node, container("info", None));
    Ok(Visit::Descend)
}

/// Applies a captured title unless the container already has one.
fn admonition_leave<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    let title = t.scope_value(node, "admonition_title").cloned();
    t.leave_nesting_with(node, |markup| {
        if let (Some(Value::String(title)), Some(element)) = (title, markup.element_mut()) {
            element.attributes.set_default("title", title);
        }
    });
    Ok(Departure::Done)
}

fn versionmodified_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let (kind, title) = match node.str_attr("type") {
        Some("versionadded") => ("info", "Version added"),
        Some("versionchanged") => ("info", "Version changed"),
        Some("deprecated") => ("warning", "Deprecated"),
        _ => return Ok(Visit::Descend),
    };
    t.enter_nesting(node, container(kind, Some(title)));
    Ok(Visit::Descend)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{paragraph, text, translate};
    use crate::formats::mdx::render_nodes;
    use crate::source::{NodeKind, SourceNode};

    fn titled(kind: NodeKind, title: &str, body: &str) -> SourceNode {
        SourceNode::new(kind)
            .with_child(SourceNode::new(NodeKind::Title).with_child(text(title)))
            .with_child(paragraph(body))
    }

    #[test]
    fn admonitions_capture_their_title() {
        let doc = translate(vec![titled(NodeKind::Admonition, "Heads up", "Read this.")]);
        assert_eq!(
            render_nodes(&doc.children),
            "<Container type=\"admonition\" title=\"Heads up\">\n  Read this.\n</Container>"
        );
    }

    #[test]
    fn specific_admonitions_use_their_tag() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Warning).with_child(paragraph("Careful.")),
            SourceNode::new(NodeKind::Seealso).with_child(paragraph("Elsewhere.")),
        ]);
        assert_eq!(
            render_nodes(&doc.children),
            "<Container type=\"warning\">\n  Careful.\n</Container>\n\n\
             <Container type=\"info\" title=\"See also:\">\n  Elsewhere.\n</Container>"
        );
    }

    #[test]
    fn nested_titles_stay_with_their_owner() {
        let inner = titled(NodeKind::Note, "Inner", "Deep.");
        let doc = translate(vec![SourceNode::new(NodeKind::Topic)
            .with_child(inner)
            .with_child(paragraph("Shallow."))]);
        let rendered = render_nodes(&doc.children);
        assert!(rendered.starts_with("<Container type=\"info\">\n"), "{rendered}");
        assert!(rendered.contains("<Container type=\"note\" title=\"Inner\">"));
    }

    #[test]
    fn version_notes_pick_a_container() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Versionmodified)
                .with_attr("type", "deprecated")
                .with_child(paragraph("Since 2.0.")),
            SourceNode::new(NodeKind::Versionmodified)
                .with_attr("type", "versionmoved")
                .with_child(paragraph("Plain.")),
        ]);
        assert_eq!(
            render_nodes(&doc.children),
            "<Container type=\"warning\" title=\"Deprecated\">\n  Since 2.0.\n</Container>\n\nPlain."
        );
    }
}
