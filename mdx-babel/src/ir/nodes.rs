//! Core data structures for the target markup tree.
//!
//! Every emittable construct of the MDX dialect is a variant of [`Node`]. Containers own their
//! children; list items, table rows and cells only exist inside their parents, so an ill-typed
//! tree cannot be built.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Root of a target tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_matter: Option<FrontMatter>,
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            front_matter: None,
            children,
        }
    }
}

/// Page metadata emitted as a YAML block ahead of the content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontMatter {
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Text { value: String },
    Emphasis { children: Vec<Node> },
    Strong { children: Vec<Node> },
    Strikethrough { children: Vec<Node> },
    InlineCode { value: String },
    CodeBlock(CodeBlock),
    Heading(Heading),
    Paragraph { children: Vec<Node> },
    List(List),
    Table(Table),
    Link(Link),
    Image(Image),
    Blockquote { children: Vec<Node> },
    ThematicBreak,
    Element(Element),
    /// Emitted verbatim between braces.
    Expression { value: String },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        Node::InlineCode {
            value: value.into(),
        }
    }

    /// An expression holding `value` as a JSON literal.
    pub fn json(value: &Value) -> Self {
        Node::Expression {
            value: value.to_string(),
        }
    }

    /// Child list of containers with free-form content.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Strikethrough { children }
            | Node::Paragraph { children }
            | Node::Blockquote { children } => Some(children),
            Node::Heading(heading) => Some(&mut heading.children),
            Node::Link(link) => Some(&mut link.children),
            Node::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }

    /// Whether this node renders as phrasing content.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text { .. }
            | Node::Emphasis { .. }
            | Node::Strong { .. }
            | Node::Strikethrough { .. }
            | Node::InlineCode { .. }
            | Node::Link(_)
            | Node::Image(_)
            | Node::Expression { .. } => true,
            Node::Element(element) => element.kind == ElementKind::Text,
            _ => false,
        }
    }

    /// Whether this node's children are phrasing content.
    pub fn has_inline_children(&self) -> bool {
        matches!(
            self,
            Node::Paragraph { .. }
                | Node::Heading(_)
                | Node::Link(_)
                | Node::Emphasis { .. }
                | Node::Strong { .. }
                | Node::Strikethrough { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// 1 to 6.
    pub depth: u8,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn unordered() -> Self {
        Self::default()
    }

    pub fn ordered(start: Option<u32>) -> Self {
        Self {
            ordered: true,
            start,
            items: Vec::new(),
        }
    }

    /// True iff any item is spread.
    pub fn is_spread(&self) -> bool {
        self.items.iter().any(ListItem::is_spread)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListItem {
    pub spread: bool,
    pub children: Vec<Node>,
}

impl ListItem {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            spread: false,
            children,
        }
    }

    /// Explicitly spread, or holding an ordered sub-list.
    pub fn is_spread(&self) -> bool {
        self.spread
            || self
                .children
                .iter()
                .any(|child| matches!(child, Node::List(list) if list.ordered))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Vec<Node>>,
}

/// Column spec; `width` is a relative weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    pub header: bool,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub col_span: u32,
    pub row_span: u32,
    pub children: Vec<Node>,
}

impl Cell {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            col_span: 1,
            row_span: 1,
            children,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Flow elements hold blocks, text elements hold phrasing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Flow,
    Text,
}

/// A component element, `<Name attr=...>children</Name>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn flow(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Flow)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Text)
    }

    fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes: Attributes::default(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Sets the attribute unless `value` is `None`.
    pub fn with_optional_attr<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_attr(key, value),
            None => self,
        }
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("className", class)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Ordered attribute list with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, Value)>);

impl Attributes {
    /// Last write wins; an existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Sets the attribute only if it is absent; returns whether it was set.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.0.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.0.iter().position(|(existing, _)| existing == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
