//! In-process [`HtmlToTree`] implementation on top of `html5ever`.

use super::HtmlToTree;
use crate::error::RenderError;
use crate::ir::nodes::{Element, Node};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde_json::{Map, Value};

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "download",
    "hidden",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "open",
    "readonly",
    "required",
    "reversed",
    "selected",
];

const RENAMED_ATTRIBUTES: &[(&str, &str)] = &[
    ("class", "className"),
    ("for", "htmlFor"),
    ("accesskey", "accessKey"),
    ("allowfullscreen", "allowFullScreen"),
    ("autoplay", "autoPlay"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
    ("colspan", "colSpan"),
    ("contenteditable", "contentEditable"),
    ("crossorigin", "crossOrigin"),
    ("datetime", "dateTime"),
    ("enctype", "encType"),
    ("frameborder", "frameBorder"),
    ("hreflang", "hrefLang"),
    ("maxlength", "maxLength"),
    ("novalidate", "noValidate"),
    ("readonly", "readOnly"),
    ("rowspan", "rowSpan"),
    ("spellcheck", "spellCheck"),
    ("srcset", "srcSet"),
    ("tabindex", "tabIndex"),
    ("usemap", "useMap"),
];

/// Parses fragments with `html5ever` and rejects anything the parser had to repair.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everRenderer;

impl Html5everRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlToTree for Html5everRenderer {
    fn probe(&self) -> Result<(), RenderError> {
        Ok(())
    }

    fn html_to_tree(&self, html: &str) -> Result<Vec<Node>, RenderError> {
        // An explicit doctype and head keep the tree builder from reporting
        // errors about the wrapper itself.
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .one(wrapped.as_bytes());

        if let Some(error) = dom.errors.borrow().first() {
            return Err(RenderError::Malformed(error.to_string()));
        }

        let body = find_element(&dom.document, "body")
            .ok_or_else(|| RenderError::Malformed("fragment has no body".to_string()))?;
        let children = body.children.borrow();
        Ok(children.iter().filter_map(convert).collect())
    }
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: qname, .. } = &handle.data {
        if &*qname.local == name {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() && text.contains('\n') {
                None
            } else {
                Some(Node::text(text))
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = &*name.local;
            let mut element = if BLOCK_ELEMENTS.contains(&tag) {
                Element::flow(tag)
            } else {
                Element::text(tag)
            };
            for attribute in attrs.borrow().iter() {
                let (key, value) = convert_attribute(&attribute.name.local, &attribute.value);
                element.attributes.set(key, value);
            }
            element.children = handle
                .children
                .borrow()
                .iter()
                .filter_map(convert)
                .collect();
            Some(element.into())
        }
        _ => None,
    }
}

fn convert_attribute(name: &str, value: &str) -> (String, Value) {
    let key = RENAMED_ATTRIBUTES
        .iter()
        .find(|(html, _)| *html == name)
        .map(|(_, jsx)| jsx.to_string())
        .unwrap_or_else(|| name.to_string());

    if name == "style" {
        return (key, Value::Object(style_object(value)));
    }
    if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&name) {
        return (key, Value::Bool(true));
    }
    (key, Value::String(value.to_string()))
}

/// `"font-size: 1em; color: red"` → `{"fontSize": "1em", "color": "red"}`.
fn style_object(style: &str) -> Map<String, Value> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| (property.trim(), value.trim()))
        .filter(|(property, _)| !property.is_empty())
        .map(|(property, value)| (camel_case(property), Value::String(value.to_string())))
        .collect()
}

fn camel_case(property: &str) -> String {
    let mut result = String::with_capacity(property.len());
    let mut upper = false;
    for ch in property.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            result.extend(ch.to_uppercase());
            upper = false;
        } else {
            result.push(ch);
        }
    }
    result
}
