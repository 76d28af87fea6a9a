//! Context scopes: handler overrides and key/value data tied to one subtree.

use super::dispatch::Handler;
use crate::source::{NodeKind, SourceNode};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A scope pushed by `owner` and popped once its traversal completes.
#[derive(Debug)]
pub(crate) struct Scope<'a> {
    pub(crate) owner: &'a SourceNode,
    handlers: HashMap<NodeKind, Vec<Handler>>,
    pub(crate) data: Map<String, Value>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(owner: &'a SourceNode, handlers: Vec<(NodeKind, Handler)>) -> Self {
        let mut by_kind: HashMap<NodeKind, Vec<Handler>> = HashMap::new();
        for (kind, handler) in handlers {
            by_kind.entry(kind).or_default().push(handler);
        }
        Self {
            owner,
            handlers: by_kind,
            data: Map::new(),
        }
    }

    pub(crate) fn handlers(&self, kind: &NodeKind) -> &[Handler] {
        self.handlers.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn is_owned_by(&self, node: &SourceNode) -> bool {
        std::ptr::eq(self.owner, node)
    }
}
