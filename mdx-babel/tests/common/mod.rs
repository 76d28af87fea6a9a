//! Shared helpers: source trees are written as JSON, the way the upstream compiler
//! hands them over.

use mdx_babel::formats::mdx::serialize_to_mdx;
use mdx_babel::ir::nodes::Document;
use mdx_babel::paths::Pathfinder;
use mdx_babel::source::SourceNode;
use mdx_babel::translate::Environment;
use serde_json::Value;

pub fn tree(json: Value) -> SourceNode {
    serde_json::from_value(json).expect("valid source tree")
}

/// `{"kind": "text", ...}` shorthand.
pub fn text(value: &str) -> Value {
    serde_json::json!({"kind": "text", "attributes": {"value": value}})
}

/// `{"kind": "paragraph", ...}` holding a single text node.
pub fn para(value: &str) -> Value {
    serde_json::json!({"kind": "paragraph", "children": [text(value)]})
}

pub fn translate(doc_id: &str, json: Value) -> Document {
    let env = Environment::new(Pathfinder::new("/src", "/out"));
    env.translate(doc_id, None, &tree(json))
        .expect("translation to succeed")
}

pub fn to_mdx(doc_id: &str, json: Value) -> String {
    serialize_to_mdx(&translate(doc_id, json)).expect("serialization to succeed")
}
