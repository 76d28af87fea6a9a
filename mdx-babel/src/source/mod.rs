//! Source document trees handed over by the upstream compiler.
//!
//!     A source tree is a plain tagged tree: every node has a kind, a map of JSON attributes,
//!     ordered children and an optional position. Text lives in the `value` attribute of
//!     `text` nodes. Identifiers live in the `ids` array attribute; the first one is the
//!     primary identifier.
//!
//!     Trees are read-only for the translator. A whole documentation set is loaded as a
//!     [`DocumentSet`], which also serves titles and doctrees to the sidebar projector and to
//!     cross-document link resolution through [`DocumentLookup`].

mod kind;

pub use kind::NodeKind;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a node came from in the original sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => f.write_str(&self.file),
        }
    }
}

/// A node of a source document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl SourceNode {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Map::new(),
            children: Vec::new(),
            position: None,
        }
    }

    /// A `text` node holding `value`.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_attr("value", value.into())
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SourceNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.position = Some(Position {
            file: file.into(),
            line: Some(line),
        });
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Numeric attribute; numeric strings are accepted as well.
    pub fn f64_attr(&self, key: &str) -> Option<f64> {
        match self.attributes.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u32_attr(&self, key: &str) -> Option<u32> {
        self.f64_attr(key)
            .filter(|value| *value >= 0.0 && value.fract() == 0.0)
            .map(|value| value as u32)
    }

    pub fn bool_attr(&self, key: &str) -> bool {
        matches!(self.attributes.get(key), Some(Value::Bool(true)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.string_list("ids")
    }

    pub fn primary_id(&self) -> Option<&str> {
        self.ids().next()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.string_list("classes")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|candidate| candidate == class)
    }

    /// Concatenated text of every descendant `text` node.
    pub fn astext(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, buffer: &mut String) {
        if self.kind == NodeKind::Text {
            if let Some(value) = self.str_attr("value") {
                buffer.push_str(value);
            }
        }
        for child in &self.children {
            child.collect_text(buffer);
        }
    }

    /// First descendant of `kind` in document order, excluding `self`.
    pub fn find(&self, kind: &NodeKind) -> Option<&SourceNode> {
        self.children.iter().find_map(|child| {
            if &child.kind == kind {
                Some(child)
            } else {
                child.find(kind)
            }
        })
    }

    /// Every descendant of `kind` in document order, excluding `self`.
    pub fn find_all<'a>(&'a self, kind: &NodeKind) -> Vec<&'a SourceNode> {
        let mut found = Vec::new();
        self.collect_kind(kind, &mut found);
        found
    }

    fn collect_kind<'a>(&'a self, kind: &NodeKind, found: &mut Vec<&'a SourceNode>) {
        for child in &self.children {
            if &child.kind == kind {
                found.push(child);
            }
            child.collect_kind(kind, found);
        }
    }

    fn string_list(&self, key: &str) -> impl Iterator<Item = &str> {
        self.attributes
            .get(key)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

/// Read access to the documents of a build, keyed by document id.
pub trait DocumentLookup {
    fn title(&self, id: &str) -> Option<&str>;
    fn doctree(&self, id: &str) -> Option<&SourceNode>;
}

/// One document of a [`DocumentSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    /// Source file, relative to the source root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tree: SourceNode,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, tree: SourceNode) -> Self {
        Self {
            id: id.into(),
            source: None,
            title: None,
            tree,
        }
    }

    pub fn with_source(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declared title, else the `title` attribute of the tree, else the first heading.
    pub fn resolved_title(&self) -> Option<String> {
        if let Some(title) = &self.title {
            return Some(title.clone());
        }
        if let Some(title) = self.tree.str_attr("title") {
            return Some(title.to_string());
        }
        self.tree
            .find(&NodeKind::Section)
            .and_then(|section| section.find(&NodeKind::Title))
            .map(SourceNode::astext)
    }
}

#[derive(Deserialize)]
struct Bundle {
    #[serde(default)]
    project: Option<String>,
    #[serde(default = "default_root")]
    root: String,
    documents: Vec<SourceDocument>,
}

fn default_root() -> String {
    "index".to_string()
}

/// All documents of one build, as produced by the upstream compiler.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    project: Option<String>,
    root: String,
    documents: Vec<SourceDocument>,
    titles: HashMap<String, String>,
    index: HashMap<String, usize>,
}

impl DocumentSet {
    pub fn new(documents: Vec<SourceDocument>) -> Self {
        let index = documents
            .iter()
            .enumerate()
            .map(|(position, document)| (document.id.clone(), position))
            .collect();
        let titles = documents
            .iter()
            .filter_map(|document| Some((document.id.clone(), document.resolved_title()?)))
            .collect();
        Self {
            project: None,
            root: default_root(),
            documents,
            titles,
            index,
        }
    }

    /// Parses a JSON bundle: `{"project", "root", "documents": [{"id", "source", "title", "tree"}]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let bundle: Bundle = serde_json::from_str(json)?;
        Ok(Self::new(bundle.documents)
            .with_project(bundle.project)
            .with_root(bundle.root))
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&SourceDocument> {
        self.index.get(id).map(|position| &self.documents[*position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentLookup for DocumentSet {
    fn title(&self, id: &str) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    fn doctree(&self, id: &str) -> Option<&SourceNode> {
        self.get(id).map(|document| &document.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nodes_from_json() {
        let node: SourceNode = serde_json::from_str(
            r#"{"kind": "paragraph", "attributes": {"ids": ["intro", "alt"]},
                "position": {"file": "index.rst", "line": 3},
                "children": [{"kind": "text", "attributes": {"value": "Hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(node.kind, NodeKind::Paragraph);
        assert_eq!(node.primary_id(), Some("intro"));
        assert_eq!(node.astext(), "Hello");
        assert_eq!(node.position.unwrap().to_string(), "index.rst:3");
    }

    #[test]
    fn numeric_attributes_accept_strings() {
        let node = SourceNode::new("entry")
            .with_attr("morecols", "2")
            .with_attr("colwidth", 30);
        assert_eq!(node.u32_attr("morecols"), Some(2));
        assert_eq!(node.f64_attr("colwidth"), Some(30.0));
        assert_eq!(node.u32_attr("morerows"), None);
    }

    #[test]
    fn bundle_titles_fall_back_to_first_heading() {
        let json = r#"{
            "project": "Demo",
            "documents": [
                {"id": "index", "title": "Home", "tree": {"kind": "document"}},
                {"id": "guide", "tree": {"kind": "document", "children": [
                    {"kind": "section", "children": [
                        {"kind": "title", "children": [{"kind": "text", "attributes": {"value": "Guide"}}]}
                    ]}
                ]}}
            ]
        }"#;
        let set = DocumentSet::from_json(json).unwrap();
        assert_eq!(set.project(), Some("Demo"));
        assert_eq!(set.root(), "index");
        assert_eq!(set.title("index"), Some("Home"));
        assert_eq!(set.title("guide"), Some("Guide"));
        assert!(set.doctree("missing").is_none());
    }
}
