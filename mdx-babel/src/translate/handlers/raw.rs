//! Raw HTML passthrough and `<meta>` tags.
//!
//! Block-level raw HTML is rendered whole. Inside a paragraph the source splits an
//! element into separate raw nodes for its opening and closing tags, so an opening tag
//! opens a frame owned by the paragraph and a later closing tag closes it again; the
//! paragraph closes whatever is still open when it ends.

use crate::error::TranslateError;
use crate::ir::nodes::{Element, Node};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Handler, HandlerTable, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Raw, Handler::enter_only(raw_enter));
    table.register(NodeKind::Meta, Handler::enter_only(meta_enter));
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// First tag of an inline fragment.
#[derive(Debug, PartialEq)]
enum Tag<'s> {
    Open(&'s str),
    Void(&'s str),
    Close(&'s str),
}

/// Classifies a fragment consisting of exactly one tag; `None` for anything else.
fn single_tag(html: &str) -> Option<Tag<'_>> {
    let inner = html.trim().strip_prefix('<')?.strip_suffix('>')?;
    if inner.contains(['<', '>']) {
        return None;
    }
    if let Some(closing) = inner.strip_prefix('/') {
        return Some(Tag::Close(closing.trim()));
    }
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = &inner[..end];
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    if inner.ends_with('/') || is_void(name) {
        Some(Tag::Void(name))
    } else {
        Some(Tag::Open(name))
    }
}

fn raw_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let is_html = node
        .str_attr("format")
        .is_some_and(|format| format.split_whitespace().any(|f| f == "html"));
    if !is_html {
        return Ok(Visit::Skip);
    }

    let html = node.astext();
    match t.parent() {
        Some(parent) if parent.kind == NodeKind::Paragraph => inline_html(t, node, parent, &html),
        _ => {
            if let Some(nodes) = render(t, node, &html) {
                for rendered in nodes {
                    t.append_child(Some(node), rendered);
                }
            }
        }
    }
    Ok(Visit::Skip)
}

fn inline_html<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
    paragraph: &'a SourceNode,
    html: &str,
) {
    match single_tag(html) {
        Some(Tag::Close(name)) => {
            let matches = t.owns_top(paragraph)
                && t.top_markup()
                    .is_some_and(|markup| markup.is_element(name));
            if matches {
                t.leave_nesting(paragraph);
            } else {
                t.warn(node, &format!("closing tag </{name}> does not match an open tag"));
            }
        }
        Some(Tag::Open(name)) => {
            let closed = format!("{}</{name}>", html.trim());
            if let Some(element) = render(t, node, &closed).and_then(first_element) {
                t.enter_nesting_anchored(paragraph, element, None);
            }
        }
        Some(Tag::Void(name)) => {
            let inner = html.trim().trim_start_matches('<').trim_end_matches('>');
            let inner = inner.trim_end_matches('/').trim_end();
            let closed = if is_void(name) {
                format!("<{inner}>")
            } else {
                format!("<{inner}></{name}>")
            };
            if let Some(element) = render(t, node, &closed).and_then(first_element) {
                t.append_child(None, element);
            }
        }
        None => {
            if let Some(nodes) = render(t, node, html) {
                for rendered in nodes {
                    t.append_child(None, rendered);
                }
            }
        }
    }
}

/// Renders `html`, logging malformed input against `node`.
fn render(t: &Translator<'_>, node: &SourceNode, html: &str) -> Option<Vec<Node>> {
    match t.env().renderer().html_to_tree(html) {
        Ok(nodes) => Some(nodes),
        Err(error) => {
            t.warn(node, &format!("{error}, skipping: {html}"));
            None
        }
    }
}

fn first_element(nodes: Vec<Node>) -> Option<Node> {
    nodes
        .into_iter()
        .find(|node| matches!(node, Node::Element(_)))
}

/// `<meta>` goes into the page head; named entries also become front matter.
fn meta_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let content = node.str_attr("content");
    let name = node.str_attr("name");
    let mut meta = Element::text("meta").with_optional_attr("content", content);
    if let Some(name) = name {
        meta = meta.with_attr("name", name);
    } else if let Some(property) = node.str_attr("property") {
        meta = meta.with_attr("property", property);
    } else if let Some(http_equiv) = node.str_attr("http-equiv") {
        meta = meta.with_attr("httpEquiv", http_equiv);
    }
    meta = meta.with_optional_attr("lang", node.str_attr("lang"));

    if let (Some(name), Some(content)) = (name, content) {
        t.set_metadata_default(name, content);
    }
    t.append_child(
        Some(node),
        Element::flow("Helmet").with_child(meta.into()),
    );
    Ok(Visit::Skip)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{text, translate};
    use super::*;
    use crate::formats::mdx::{render_nodes, serialize_to_mdx};
    use tracing_test::traced_test;

    fn raw(html: &str) -> SourceNode {
        SourceNode::new(NodeKind::Raw)
            .with_attr("format", "html")
            .with_child(text(html))
    }

    #[test]
    fn single_tags_are_classified() {
        assert_eq!(single_tag("<span class=\"x\">"), Some(Tag::Open("span")));
        assert_eq!(single_tag("</span>"), Some(Tag::Close("span")));
        assert_eq!(single_tag("<br>"), Some(Tag::Void("br")));
        assert_eq!(single_tag("<x-icon />"), Some(Tag::Void("x-icon")));
        assert_eq!(single_tag("<b>bold</b>"), None);
        assert_eq!(single_tag("plain"), None);
    }

    #[test]
    fn inline_tags_wrap_the_text_between_them() {
        let doc = translate(vec![SourceNode::new(NodeKind::Paragraph)
            .with_child(text("Press "))
            .with_child(raw("<span class=\"key\">"))
            .with_child(text("Enter"))
            .with_child(raw("</span>"))
            .with_child(raw("<br>"))]);
        assert_eq!(
            render_nodes(&doc.children),
            "Press <span className=\"key\">Enter</span><br></br>"
        );
    }

    #[test]
    fn unclosed_inline_tags_close_with_the_paragraph() {
        let doc = translate(vec![SourceNode::new(NodeKind::Paragraph)
            .with_child(raw("<em>"))
            .with_child(text("open"))]);
        assert_eq!(render_nodes(&doc.children), "<em>open</em>");
    }

    #[test]
    #[traced_test]
    fn malformed_html_is_skipped_with_a_warning() {
        let doc = translate(vec![
            raw("<div></span></div>"),
            SourceNode::new(NodeKind::Paragraph)
                .with_child(text("kept"))
                .with_child(raw("</strong>")),
        ]);
        assert_eq!(render_nodes(&doc.children), "kept");
        assert!(logs_contain("malformed HTML"));
        assert!(logs_contain("does not match an open tag"));
    }

    #[test]
    fn non_html_raw_content_is_dropped() {
        let doc = translate(vec![SourceNode::new(NodeKind::Raw)
            .with_attr("format", "latex")
            .with_child(text("\\newpage"))]);
        assert!(doc.children.is_empty());
    }

    #[test]
    fn meta_tags_feed_front_matter() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Meta)
                .with_attr("name", "description")
                .with_attr("content", "An intro"),
            SourceNode::new(NodeKind::Meta)
                .with_attr("http-equiv", "refresh")
                .with_attr("content", "5"),
        ]);
        assert_eq!(
            serialize_to_mdx(&doc).unwrap(),
            "---\ndescription: An intro\n---\n\n\
             <Helmet>\n  <meta content=\"An intro\" name=\"description\"></meta>\n</Helmet>\n\n\
             <Helmet>\n  <meta content=\"5\" httpEquiv=\"refresh\"></meta>\n</Helmet>\n"
        );
    }
}
