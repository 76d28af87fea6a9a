//! Links, footnotes, images and downloads.

use super::{close, close_all};
use crate::error::TranslateError;
use crate::ir::nodes::{Element, Image, Link, Node};
use crate::paths::{is_external, resolve_reference};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Handler, HandlerTable, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Reference, Handler::new(reference_enter, close));
    table.register(
        NodeKind::FootnoteReference,
        Handler::new(footnote_reference_enter, close_all),
    );
    table.register(NodeKind::Footnote, Handler::new(footnote_enter, close));
    table.register(NodeKind::Image, Handler::enter_only(image_enter));
    table.register(
        NodeKind::DownloadReference,
        Handler::new(download_reference_enter, close),
    );
}

/// Link target of a reference node, or `None` when it points nowhere.
fn reference_url(t: &Translator<'_>, node: &SourceNode) -> Option<String> {
    if let Some(refid) = node.str_attr("refid") {
        return Some(format!("#{refid}"));
    }
    let refuri = node.str_attr("refuri")?;
    if refuri.is_empty() {
        return Some("#".to_string());
    }
    if is_external(refuri) {
        return Some(refuri.to_string());
    }
    Some(t.env().pathfinder.rewrite_cross_document_link(refuri))
}

/// Title of the document an empty internal reference points to.
fn target_title(t: &Translator<'_>, node: &SourceNode) -> Option<String> {
    if !node.children.is_empty() || node.attr("refid").is_some() {
        return None;
    }
    let refuri = node.str_attr("refuri").filter(|uri| !is_external(uri))?;
    let target = resolve_reference(t.doc_id(), refuri);
    t.env()
        .documents()?
        .title(&target)
        .map(ToString::to_string)
}

fn reference_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let Some(url) = reference_url(t, node) else {
        return Ok(Visit::Descend);
    };
    let children = target_title(t, node)
        .map(|title| vec![Node::text(title)])
        .unwrap_or_default();
    let link = Link {
        url,
        title: node.str_attr("reftitle").map(ToString::to_string),
        children,
    };
    t.enter_nesting(node, Node::Link(link));
    Ok(Visit::Descend)
}

fn footnote_reference_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::text("sup"));
    if let Some(url) = reference_url(t, node) {
        let link = Link {
            url,
            title: None,
            children: Vec::new(),
        };
        t.enter_nesting_anchored(node, Node::Link(link), None);
    }
    Ok(Visit::Descend)
}

/// Footnotes and citations; the label is lifted into an attribute.
fn footnote_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let label = node.find(&NodeKind::Label).map(SourceNode::astext);
    let footnote = Element::flow("Footnote")
        .with_optional_attr("label", label)
        .with_optional_attr("backrefs", node.attr("backrefs").cloned());
    t.enter_nesting(node, footnote);
    Ok(Visit::Descend)
}

fn image_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let uri = node
        .str_attr("uri")
        .ok_or_else(|| t.missing_attribute(node, "uri"))?;
    let image = Image {
        url: t.add_image(uri),
        title: node.str_attr("title").map(ToString::to_string),
        alt: node.str_attr("alt").map(ToString::to_string),
    };
    t.append_child(Some(node), Node::Image(image));
    Ok(Visit::Skip)
}

fn download_reference_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let target = node
        .str_attr("reftarget")
        .ok_or_else(|| t.missing_attribute(node, "reftarget"))?;
    let href = t.add_download(target);
    t.enter_nesting(
        node,
        Element::text("a").with_attr("href", href).with_attr("download", true),
    );
    Ok(Visit::Descend)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{paragraph, text, translate};
    use crate::error::TranslateError;
    use crate::formats::mdx::render_nodes;
    use crate::paths::Pathfinder;
    use crate::source::{DocumentSet, NodeKind, SourceDocument, SourceNode};
    use crate::translate::Environment;

    fn reference(attr: &str, value: &str, label: Option<&str>) -> SourceNode {
        let node = SourceNode::new(NodeKind::Reference).with_attr(attr, value);
        match label {
            Some(label) => node.with_child(text(label)),
            None => node,
        }
    }

    fn rendered_paragraph(children: Vec<SourceNode>) -> String {
        let doc = translate(vec![SourceNode::new(NodeKind::Paragraph).with_children(children)]);
        render_nodes(&doc.children)
    }

    #[test]
    fn references_pick_their_destination() {
        let rendered = rendered_paragraph(vec![
            reference("refid", "usage", Some("below")),
            text(", "),
            reference("refuri", "https://docs.rs/", Some("docs")),
            text(", "),
            reference("refuri", "../api/Index#top", Some("api")),
        ]);
        assert_eq!(
            rendered,
            "[below](#usage), [docs](https://docs.rs/), [api](../api/Index.mdx#top)"
        );
    }

    #[test]
    fn references_without_target_are_transparent() {
        let rendered = rendered_paragraph(vec![
            SourceNode::new(NodeKind::Reference).with_child(text("dangling")),
        ]);
        assert_eq!(rendered, "dangling");
    }

    #[test]
    fn empty_internal_links_borrow_the_document_title() {
        let documents = DocumentSet::new(vec![
            SourceDocument::new("guide/intro", SourceNode::new(NodeKind::Document)),
            SourceDocument::new("guide/setup", SourceNode::new(NodeKind::Document))
                .with_title("Setting up"),
        ]);
        let env = Environment::new(Pathfinder::new("/src", "/out")).with_documents(&documents);
        let tree = SourceNode::new(NodeKind::Document).with_child(
            SourceNode::new(NodeKind::Paragraph).with_child(reference("refuri", "setup", None)),
        );
        let doc = env.translate("guide/intro", None, &tree).unwrap();
        assert_eq!(render_nodes(&doc.children), "[Setting up](setup.mdx)");
    }

    #[test]
    fn footnotes_carry_label_and_backrefs() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Paragraph).with_child(text("Claim")).with_child(
                SourceNode::new(NodeKind::FootnoteReference)
                    .with_attr("refid", "fn1")
                    .with_child(text("1")),
            ),
            SourceNode::new(NodeKind::Footnote)
                .with_attr("ids", vec!["fn1"])
                .with_attr("backrefs", vec!["ref1"])
                .with_child(SourceNode::new(NodeKind::Label).with_child(text("1")))
                .with_child(paragraph("Source.")),
        ]);
        assert_eq!(
            render_nodes(&doc.children),
            "Claim<sup>[1](#fn1)</sup>\n\n\
             <Footnote label=\"1\" backrefs={[\"ref1\"]} id=\"fn1\">\n  Source.\n</Footnote>"
        );
    }

    #[test]
    fn images_require_a_uri() {
        let env = Environment::new(Pathfinder::new("/src", "/out"));
        let tree = SourceNode::new(NodeKind::Document)
            .with_child(SourceNode::new(NodeKind::Image).at("intro.rst", 7));
        let error = env.translate("intro", None, &tree).unwrap_err();
        assert_eq!(
            error,
            TranslateError::MissingAttribute {
                kind: "image".to_string(),
                attribute: "uri".to_string(),
                location: "intro.rst:7".to_string(),
            }
        );
        assert!(!error.is_fatal());
    }

    #[test]
    fn images_and_downloads_point_into_the_assets() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Image)
                .with_attr("uri", "img/logo.png")
                .with_attr("alt", "Logo"),
            SourceNode::new(NodeKind::Paragraph).with_child(
                SourceNode::new(NodeKind::DownloadReference)
                    .with_attr("reftarget", "/files/data.csv")
                    .with_child(text("data")),
            ),
        ]);
        assert_eq!(
            render_nodes(&doc.children),
            "![Logo](../_assets/logo.png)\n\n\
             <a href=\"../_assets/data.csv\" download>data</a>"
        );
    }
}
