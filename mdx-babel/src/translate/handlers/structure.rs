//! Document structure: sections, titles, paragraphs, text and block containers.

use super::{close, close_all};
use crate::error::TranslateError;
use crate::ir::nodes::{CodeBlock, Element, Heading, Node};
use crate::source::{NodeKind, SourceNode};
use crate::translate::{Departure, Handler, HandlerTable, Markup, Translator, Visit};

pub(super) fn register(table: &mut HandlerTable) {
    table.register(NodeKind::Document, Handler::enter_only(document_enter));
    table.register(NodeKind::Section, Handler::new(section_enter, section_leave));
    table.register(NodeKind::Title, Handler::new(title_enter, close));
    table.register(NodeKind::Paragraph, Handler::new(paragraph_enter, close_all));
    table.register(NodeKind::Text, Handler::enter_only(text_enter));
    table.register(NodeKind::LiteralBlock, Handler::enter_only(literal_block_enter));
    table.register(NodeKind::Transition, Handler::enter_only(transition_enter));
    table.register(NodeKind::BlockQuote, Handler::new(block_quote_enter, close));
    table.register(NodeKind::Compound, Handler::new(compound_enter, close));
    table.register(NodeKind::Container, Handler::new(container_enter, close));
    table.register(NodeKind::Hlist, Handler::new(hlist_enter, close_all));
    table.register(NodeKind::Target, Handler::new(target_enter, close));
}

fn document_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    if let Some(title) = node.str_attr("title") {
        t.set_metadata_default("title", title);
    }
    Ok(Visit::Descend)
}

fn section_enter<'a>(t: &mut Translator<'a>, _node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.section_depth = t.section_depth.saturating_add(1);
    Ok(Visit::Descend)
}

fn section_leave<'a>(
    t: &mut Translator<'a>,
    _node: &'a SourceNode,
) -> Result<Departure, TranslateError> {
    t.section_depth = t.section_depth.saturating_sub(1);
    Ok(Departure::Done)
}

/// Titles depend on what they name: tables get a caption, sidebars a styled paragraph,
/// admonitions and topics a `title` attribute, sections a heading.
fn title_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let parent = t.parent();
    let parent_kind = parent.map(|parent| &parent.kind);

    match parent_kind {
        Some(NodeKind::Table) => {
            t.enter_nesting(node, Markup::Caption(Vec::new()));
        }
        Some(NodeKind::Sidebar) => {
            t.enter_nesting(node, Element::flow("p").with_class("sidebar-title"));
        }
        Some(kind) if kind.is_admonition() || *kind == NodeKind::Topic => {
            t.set_context("admonition_title", node.astext());
            return Ok(Visit::Skip);
        }
        _ => {
            let depth = t.section_depth.clamp(1, 6);
            let anchor = node
                .primary_id()
                .or_else(|| parent.and_then(SourceNode::primary_id));
            let heading = Node::Heading(Heading {
                depth,
                children: Vec::new(),
            });
            t.enter_nesting_anchored(node, heading, anchor);
        }
    }
    Ok(Visit::Descend)
}

fn paragraph_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Node::paragraph(Vec::new()));
    Ok(Visit::Descend)
}

fn text_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    if let Some(value) = node.str_attr("value") {
        t.append_child(None, Node::text(value));
    }
    Ok(Visit::Skip)
}

fn literal_block_enter<'a>(
    t: &mut Translator<'a>,
    node: &'a SourceNode,
) -> Result<Visit, TranslateError> {
    let options = &t.env().options;
    let declared = if node.kind == NodeKind::DoctestBlock {
        Some("python")
    } else {
        node.str_attr("language").filter(|lang| *lang != "default")
    };
    let language = declared.unwrap_or(options.default_code_language.as_str());
    let language = options
        .language_aliases
        .get(language)
        .map(String::as_str)
        .unwrap_or(language);

    let text = node.astext();
    let content = text.trim_matches('\n').trim_end().to_string();
    let code = CodeBlock {
        content,
        lang: (!language.is_empty()).then(|| language.to_string()),
    };
    t.append_child(Some(node), Node::CodeBlock(code));
    Ok(Visit::Skip)
}

fn transition_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.append_child(Some(node), Node::ThematicBreak);
    Ok(Visit::Skip)
}

fn block_quote_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(
        node,
        Node::Blockquote {
            children: Vec::new(),
        },
    );
    Ok(Visit::Descend)
}

/// Table-of-contents wrappers become a component; other compounds are transparent.
fn compound_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    if node.has_class("toctree-wrapper") {
        t.enter_nesting(node, Element::flow("TableOfContents"));
    }
    Ok(Visit::Descend)
}

fn container_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    let classes = node.classes().collect::<Vec<_>>().join(" ");
    let element = Element::flow("div").with_optional_attr(
        "className",
        (!classes.is_empty()).then_some(classes),
    );
    t.enter_nesting(node, element);
    Ok(Visit::Descend)
}

fn hlist_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    t.enter_nesting(node, Element::flow("HorizontalList"));
    t.enter_nesting_anchored(node, Element::flow("table"), None);
    t.enter_nesting_anchored(node, Element::flow("tr"), None);
    Ok(Visit::Descend)
}

/// Targets with content wrap it; empty targets only leave their anchor behind.
fn target_enter<'a>(t: &mut Translator<'a>, node: &'a SourceNode) -> Result<Visit, TranslateError> {
    if node.children.is_empty() {
        t.append_anchor(node);
        return Ok(Visit::Skip);
    }
    t.enter_nesting(node, Element::text("span"));
    Ok(Visit::Descend)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{paragraph, text, translate};
    use crate::ir::nodes::{CodeBlock, Element, Heading, Node};
    use crate::source::{NodeKind, SourceNode};
    use crate::translate::markup::target_marker;

    fn section(id: &str, title: &str, body: Vec<SourceNode>) -> SourceNode {
        SourceNode::new(NodeKind::Section)
            .with_attr("ids", vec![id])
            .with_child(SourceNode::new(NodeKind::Title).with_child(text(title)))
            .with_children(body)
    }

    #[test]
    fn nested_sections_deepen_headings() {
        let doc = translate(vec![section(
            "guide",
            "Guide",
            vec![section("setup", "Setup", vec![paragraph("Install it.")])],
        )]);
        assert_eq!(
            doc.children,
            vec![
                Node::Heading(Heading {
                    depth: 1,
                    children: vec![target_marker("guide"), Node::text("Guide")],
                }),
                Node::Heading(Heading {
                    depth: 2,
                    children: vec![target_marker("setup"), Node::text("Setup")],
                }),
                Node::paragraph(vec![Node::text("Install it.")]),
            ]
        );
    }

    #[test]
    fn code_blocks_resolve_languages() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::LiteralBlock)
                .with_attr("language", "ipython3")
                .with_child(text("\nprint(1)  \n\n")),
            SourceNode::new(NodeKind::LiteralBlock).with_child(text("plain")),
            SourceNode::new(NodeKind::DoctestBlock).with_child(text(">>> 1 + 1\n2")),
        ]);
        let languages: Vec<_> = doc
            .children
            .iter()
            .map(|node| match node {
                Node::CodeBlock(CodeBlock { lang, .. }) => lang.clone(),
                other => panic!("expected code block, got {other:?}"),
            })
            .collect();
        assert_eq!(
            languages,
            vec![
                Some("python".to_string()),
                Some("plaintext".to_string()),
                Some("python".to_string())
            ]
        );
        assert_eq!(
            doc.children[0],
            Node::CodeBlock(CodeBlock {
                content: "print(1)".to_string(),
                lang: Some("python".to_string()),
            })
        );
    }

    #[test]
    fn sidebar_titles_are_paragraphs() {
        let doc = translate(vec![SourceNode::new(NodeKind::Sidebar)
            .with_child(SourceNode::new(NodeKind::Title).with_child(text("Aside")))
            .with_child(paragraph("Body"))]);
        assert_eq!(
            doc.children,
            vec![Element::flow("aside")
                .with_child(
                    Element::flow("p")
                        .with_class("sidebar-title")
                        .with_child(Node::text("Aside"))
                        .into()
                )
                .with_child(Node::paragraph(vec![Node::text("Body")]))
                .into()]
        );
    }

    #[test]
    fn empty_targets_leave_an_anchor() {
        let doc = translate(vec![
            SourceNode::new(NodeKind::Target).with_attr("ids", vec!["here"]),
            paragraph("After"),
        ]);
        assert_eq!(
            doc.children,
            vec![target_marker("here"), Node::paragraph(vec![Node::text("After")])]
        );
    }

    #[test]
    fn toctree_wrappers_become_components() {
        let doc = translate(vec![SourceNode::new(NodeKind::Compound)
            .with_attr("classes", vec!["toctree-wrapper"])
            .with_child(SourceNode::new(NodeKind::Toctree))]);
        assert_eq!(doc.children, vec![Element::flow("TableOfContents").into()]);
    }
}
