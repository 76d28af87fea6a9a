//! Navigation sidebar projected from the documents' table-of-contents trees.
//!
//! Every `toctree` node of a document lists `[title, ref]` entries. Captioned toctrees
//! become categories; entries of uncaptioned ones are listed directly. Internal entries
//! recurse into the referenced document, so the sidebar mirrors the toctree hierarchy
//! starting at the root document.

use crate::error::BuildError;
use crate::paths::{is_external, Pathfinder};
use crate::source::{DocumentLookup, NodeKind, SourceNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Manifest schema version.
pub const MANIFEST_VERSION: &str = "2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarKind {
    Doc,
    Link,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarItem {
    #[serde(rename = "type")]
    pub kind: SidebarKind,
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarItem>,
}

impl SidebarItem {
    fn new(kind: SidebarKind, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// The per-build navigation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub sidebar: Vec<SidebarItem>,
}

impl Manifest {
    pub fn new(project_name: Option<String>, sidebar: Vec<SidebarItem>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            project_name,
            sidebar,
        }
    }

    pub fn to_yaml(&self) -> Result<String, BuildError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// Projects the sidebar reachable from `root_doc`.
pub fn project(
    root_doc: &str,
    documents: &dyn DocumentLookup,
    pathfinder: &Pathfinder,
) -> Vec<SidebarItem> {
    let mut projector = Projector {
        documents,
        pathfinder,
        path: HashSet::from([root_doc.to_string()]),
    };
    match documents.doctree(root_doc) {
        Some(tree) => projector.resolve(root_doc, tree),
        None => {
            warn!(document = root_doc, "root document not found, sidebar is empty");
            Vec::new()
        }
    }
}

struct Projector<'p> {
    documents: &'p dyn DocumentLookup,
    pathfinder: &'p Pathfinder,
    /// Documents on the current descent path.
    path: HashSet<String>,
}

impl Projector<'_> {
    fn resolve(&mut self, doc_id: &str, tree: &SourceNode) -> Vec<SidebarItem> {
        let mut items = Vec::new();
        for (index, toctree) in tree.find_all(&NodeKind::Toctree).into_iter().enumerate() {
            let entries = self.entries(toctree);
            match toctree.str_attr("caption").filter(|caption| !caption.is_empty()) {
                Some(caption) => {
                    let mut category = SidebarItem::new(
                        SidebarKind::Category,
                        format!("{doc_id}#toctree-{index}"),
                        caption,
                    );
                    category.children = entries;
                    items.push(category);
                }
                None => items.extend(entries),
            }
        }
        items
    }

    fn entries(&mut self, toctree: &SourceNode) -> Vec<SidebarItem> {
        let Some(Value::Array(entries)) = toctree.attr("entries") else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| {
                let pair = entry.as_array()?;
                let title = pair.first().and_then(Value::as_str);
                let reference = pair.get(1).and_then(Value::as_str)?;
                self.entry(title, reference)
            })
            .collect()
    }

    fn entry(&mut self, title: Option<&str>, reference: &str) -> Option<SidebarItem> {
        if reference == "self" {
            return None;
        }
        if is_external(reference) {
            return Some(SidebarItem::new(
                SidebarKind::Link,
                reference,
                title.unwrap_or(reference),
            ));
        }

        if self.path.contains(reference) {
            warn!(reference, "ignoring circular sidebar ref");
            return None;
        }

        let key = self.pathfinder.relative_output_path(reference);
        let title = title
            .or_else(|| self.documents.title(reference))
            .unwrap_or(reference);
        let mut item = SidebarItem::new(SidebarKind::Doc, key, title);
        let Some(tree) = self.documents.doctree(reference) else {
            warn!(reference, "sidebar entry points to an unknown document");
            return Some(item);
        };

        self.path.insert(reference.to_string());
        item.children = self.resolve(reference, tree);
        self.path.remove(reference);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DocumentSet, SourceDocument};
    use serde_json::json;
    use tracing_test::traced_test;

    fn toctree(caption: Option<&str>, entries: Value) -> SourceNode {
        let node = SourceNode::new(NodeKind::Toctree).with_attr("entries", entries);
        match caption {
            Some(caption) => node.with_attr("caption", caption),
            None => node,
        }
    }

    fn document(id: &str, title: &str, toctrees: Vec<SourceNode>) -> SourceDocument {
        let tree = SourceNode::new(NodeKind::Document).with_child(
            SourceNode::new(NodeKind::Section).with_child(
                SourceNode::new(NodeKind::Compound)
                    .with_attr("classes", vec!["toctree-wrapper"])
                    .with_children(toctrees),
            ),
        );
        SourceDocument::new(id, tree).with_title(title)
    }

    fn pathfinder() -> Pathfinder {
        Pathfinder::new("/src", "/out")
    }

    #[test]
    fn captions_become_categories() {
        let documents = DocumentSet::new(vec![
            document(
                "index",
                "Home",
                vec![
                    toctree(None, json!([[null, "intro"], [null, "self"]])),
                    toctree(
                        Some("Reference"),
                        json!([["Rust", "https://www.rust-lang.org/"], ["API", "api/index"]]),
                    ),
                ],
            ),
            document("intro", "Introduction", vec![]),
            document("api/index", "API index", vec![]),
        ]);

        let sidebar = project("index", &documents, &pathfinder());
        assert_eq!(
            sidebar,
            vec![
                SidebarItem::new(SidebarKind::Doc, "intro.mdx", "Introduction"),
                SidebarItem {
                    kind: SidebarKind::Category,
                    key: "index#toctree-1".to_string(),
                    title: "Reference".to_string(),
                    children: vec![
                        SidebarItem::new(
                            SidebarKind::Link,
                            "https://www.rust-lang.org/",
                            "Rust"
                        ),
                        SidebarItem::new(SidebarKind::Doc, "api/index.mdx", "API"),
                    ],
                },
            ]
        );
    }

    #[test]
    fn nested_toctrees_become_children() {
        let documents = DocumentSet::new(vec![
            document("index", "Home", vec![toctree(None, json!([[null, "guide"]]))]),
            document("guide", "Guide", vec![toctree(None, json!([[null, "guide/setup"]]))]),
            document("guide/setup", "Setup", vec![]),
        ]);
        let sidebar = project("index", &documents, &pathfinder());
        assert_eq!(sidebar.len(), 1);
        assert_eq!(sidebar[0].title, "Guide");
        assert_eq!(sidebar[0].children[0].key, "guide/setup.mdx");
    }

    #[test]
    #[traced_test]
    fn cycles_are_dropped_with_a_warning() {
        let documents = DocumentSet::new(vec![
            document("index", "Home", vec![toctree(None, json!([[null, "a"]]))]),
            document("a", "A", vec![toctree(None, json!([[null, "b"]]))]),
            document("b", "B", vec![toctree(None, json!([[null, "a"], [null, "index"]]))]),
        ]);
        let sidebar = project("index", &documents, &pathfinder());
        assert_eq!(sidebar[0].key, "a.mdx");
        assert_eq!(sidebar[0].children[0].key, "b.mdx");
        assert!(sidebar[0].children[0].children.is_empty());
        assert!(logs_contain("ignoring circular sidebar ref"));
    }

    #[test]
    fn shared_documents_appear_under_each_parent() {
        let documents = DocumentSet::new(vec![
            document(
                "index",
                "Home",
                vec![toctree(None, json!([[null, "a"], [null, "b"]]))],
            ),
            document("a", "A", vec![toctree(None, json!([[null, "shared"]]))]),
            document("b", "B", vec![toctree(None, json!([[null, "shared"]]))]),
            document("shared", "Shared", vec![]),
        ]);
        let sidebar = project("index", &documents, &pathfinder());
        assert_eq!(sidebar[0].children[0].title, "Shared");
        assert_eq!(sidebar[1].children[0].title, "Shared");
    }

    #[test]
    fn manifest_is_versioned_yaml() {
        let manifest = Manifest::new(
            Some("Demo".to_string()),
            vec![SidebarItem::new(SidebarKind::Doc, "intro.mdx", "Intro")],
        );
        let yaml = manifest.to_yaml().unwrap();
        insta::assert_snapshot!(yaml, @r###"
        version: '2'
        projectName: Demo
        sidebar:
        - type: doc
          key: intro.mdx
          title: Intro
        "###);
    }
}
