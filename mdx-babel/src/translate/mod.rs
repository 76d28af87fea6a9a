//! Tree translation: source document trees → target markup trees
//!
//!     The [`Translator`] walks a source tree depth-first. Every node is dispatched twice:
//!     an enter event before its children and a leave event after them. Handlers build the
//!     target tree on a nesting stack of [`Frame`]s: a handler that opens a container
//!     pushes a frame on enter and pops it on leave, at which point the finished markup is
//!     attached to the frame below.
//!
//!     Dispatch goes through a [`HandlerTable`], which resolves for every kind the chain of
//!     handlers from the most specific kind to the generic fallback. A handler may pass, in
//!     which case the next one in the chain is tried. Subtrees can install extra handlers
//!     and key/value data through context scopes; those handlers are consulted before the
//!     static table and disappear when the subtree is done.
//!
//!     One translator translates one document and is then dropped. Everything shared
//!     between documents lives in the [`Environment`], which is `Sync` so documents can be
//!     translated in parallel.

pub mod dispatch;
pub mod handlers;
pub mod markup;
mod scope;

pub use dispatch::{Departure, EnterFn, Handler, HandlerTable, LeaveFn, Visit};
pub use markup::Markup;

use crate::error::TranslateError;
use crate::formats::html::{Html5everRenderer, HtmlToTree};
use crate::ir::nodes::{Document, FrontMatter};
use crate::paths::{Pathfinder, StaticFiles};
use crate::source::{DocumentLookup, NodeKind, SourceNode};
use markup::target_marker;
use scope::Scope;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Translation settings taken from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Language of code blocks that do not declare one.
    pub default_code_language: String,
    /// Maps declared languages to the name the highlighter knows.
    pub language_aliases: HashMap<String, String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            default_code_language: "plaintext".to_string(),
            language_aliases: HashMap::from([("ipython3".to_string(), "python".to_string())]),
        }
    }
}

/// Build-wide state shared by every translation.
pub struct Environment<'d> {
    pub options: TranslateOptions,
    pub pathfinder: Pathfinder,
    assets: Mutex<StaticFiles>,
    renderer: Box<dyn HtmlToTree>,
    documents: Option<&'d (dyn DocumentLookup + Sync)>,
    handlers: HandlerTable,
}

impl<'d> Environment<'d> {
    pub fn new(pathfinder: Pathfinder) -> Self {
        Self {
            options: TranslateOptions::default(),
            assets: Mutex::new(StaticFiles::for_pathfinder(&pathfinder)),
            pathfinder,
            renderer: Box::new(Html5everRenderer::new()),
            documents: None,
            handlers: HandlerTable::standard(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn HtmlToTree>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_documents(mut self, documents: &'d (dyn DocumentLookup + Sync)) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_handlers(mut self, handlers: HandlerTable) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn renderer(&self) -> &dyn HtmlToTree {
        self.renderer.as_ref()
    }

    pub fn documents(&self) -> Option<&'d (dyn DocumentLookup + Sync)> {
        self.documents
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// The asset map. A poisoned lock is recovered: every mutation leaves the map
    /// consistent.
    pub fn assets(&self) -> MutexGuard<'_, StaticFiles> {
        self.assets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_assets(self) -> StaticFiles {
        self.assets
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Includes every asset `root` references, in document order.
    ///
    /// Running this over all documents before translating any of them fixes the
    /// disambiguated asset names independently of translation order.
    pub fn preload_assets(&self, doc_id: &str, source_path: Option<&Path>, root: &SourceNode) {
        let mut assets = self.assets();
        for node in root.find_all(&NodeKind::Image) {
            if let Some(uri) = node.str_attr("uri") {
                assets.add_image(&self.pathfinder, doc_id, source_path, uri);
            }
        }
        for node in root.find_all(&NodeKind::DownloadReference) {
            if let Some(target) = node.str_attr("reftarget") {
                assets.add_download(&self.pathfinder, doc_id, source_path, target);
            }
        }
    }

    /// Translates one document.
    pub fn translate(
        &self,
        doc_id: &str,
        source_path: Option<&Path>,
        root: &SourceNode,
    ) -> Result<Document, TranslateError> {
        Translator::new(self, doc_id, source_path, root).run()
    }
}

/// An open container on the nesting stack.
#[derive(Debug)]
pub struct Frame<'a> {
    pub origin: &'a SourceNode,
    pub markup: Markup,
    /// Identifier anchored on the markup once it is attached.
    pub anchor: Option<&'a str>,
}

/// Per-document translation state.
pub struct Translator<'a> {
    env: &'a Environment<'a>,
    doc_id: &'a str,
    source_path: Option<&'a Path>,
    root: &'a SourceNode,
    stack: Vec<Frame<'a>>,
    scopes: Vec<Scope<'a>>,
    ancestors: Vec<&'a SourceNode>,
    seen_ids: HashSet<String>,
    pub(crate) section_depth: u8,
    metadata: Map<String, Value>,
}

impl<'a> Translator<'a> {
    pub fn new(
        env: &'a Environment<'a>,
        doc_id: &'a str,
        source_path: Option<&'a Path>,
        root: &'a SourceNode,
    ) -> Self {
        Self {
            env,
            doc_id,
            source_path,
            root,
            stack: Vec::new(),
            scopes: Vec::new(),
            ancestors: Vec::new(),
            seen_ids: HashSet::new(),
            section_depth: 0,
            metadata: Map::new(),
        }
    }

    pub fn run(mut self) -> Result<Document, TranslateError> {
        self.stack.push(Frame {
            origin: self.root,
            markup: Markup::Document(Vec::new()),
            anchor: None,
        });
        self.contextualize(self.root, Vec::new());
        self.walk(self.root)?;

        let balanced = self.stack.len() == 1 && std::ptr::eq(self.stack[0].origin, self.root);
        let remaining = self.stack.len().saturating_sub(1);
        let frame = match self.stack.pop() {
            Some(frame) if balanced => frame,
            _ => {
                return Err(TranslateError::UnbalancedStack {
                    document: self.doc_id.to_string(),
                    remaining,
                })
            }
        };

        let front_matter = (!self.metadata.is_empty()).then(|| FrontMatter {
            data: std::mem::take(&mut self.metadata),
        });
        Ok(Document {
            front_matter,
            children: frame.markup.into_nodes(),
        })
    }

    fn walk(&mut self, node: &'a SourceNode) -> Result<(), TranslateError> {
        if self.dispatch_enter(node)? == Visit::Skip {
            self.release_scopes(node);
            return Ok(());
        }

        self.ancestors.push(node);
        for child in &node.children {
            self.walk(child)?;
        }
        self.ancestors.pop();

        self.dispatch_leave(node)?;
        self.release_scopes(node);
        Ok(())
    }

    fn dispatch_enter(&mut self, node: &'a SourceNode) -> Result<Visit, TranslateError> {
        let env = self.env;
        let scoped = self.scoped_handlers(&node.kind);
        for handler in scoped.iter().chain(env.handlers.chain(&node.kind)) {
            let Some(enter) = handler.enter else {
                continue;
            };
            match enter(self, node)? {
                Visit::Pass => continue,
                visit => return Ok(visit),
            }
        }
        Err(TranslateError::Unhandled {
            kind: node.kind.to_string(),
            location: self.location(node),
        })
    }

    fn dispatch_leave(&mut self, node: &'a SourceNode) -> Result<(), TranslateError> {
        let env = self.env;
        let scoped = self.scoped_handlers(&node.kind);
        for handler in scoped.iter().chain(env.handlers.chain(&node.kind)) {
            let Some(leave) = handler.leave else {
                continue;
            };
            if leave(self, node)? == Departure::Done {
                break;
            }
        }
        Ok(())
    }

    /// Scope handlers for every kind in the lineage, innermost scope first.
    fn scoped_handlers(&self, kind: &NodeKind) -> Vec<Handler> {
        if self.scopes.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        for step in kind.lineage() {
            for scope in self.scopes.iter().rev() {
                found.extend_from_slice(scope.handlers(&step));
            }
        }
        found
    }

    fn release_scopes(&mut self, node: &SourceNode) {
        while self.scopes.last().is_some_and(|scope| scope.is_owned_by(node)) {
            self.scopes.pop();
        }
    }

    pub fn env(&self) -> &'a Environment<'a> {
        self.env
    }

    pub fn doc_id(&self) -> &'a str {
        self.doc_id
    }

    pub fn source_path(&self) -> Option<&'a Path> {
        self.source_path
    }

    /// The node whose children are being walked.
    pub fn parent(&self) -> Option<&'a SourceNode> {
        self.ancestors.last().copied()
    }

    /// Opens a frame for `origin`, anchored on its primary id.
    pub fn enter_nesting(&mut self, origin: &'a SourceNode, markup: impl Into<Markup>) {
        self.enter_nesting_anchored(origin, markup, origin.primary_id());
    }

    pub fn enter_nesting_anchored(
        &mut self,
        origin: &'a SourceNode,
        markup: impl Into<Markup>,
        anchor: Option<&'a str>,
    ) {
        self.stack.push(Frame {
            origin,
            markup: markup.into(),
            anchor,
        });
    }

    /// Closes the top frame if `origin` opened it. Returns whether a frame was closed.
    pub fn leave_nesting(&mut self, origin: &'a SourceNode) -> bool {
        self.leave_nesting_with(origin, |_| {})
    }

    /// Like [`leave_nesting`](Self::leave_nesting), letting `finish` touch the markup
    /// before it is attached.
    pub fn leave_nesting_with(
        &mut self,
        origin: &'a SourceNode,
        finish: impl FnOnce(&mut Markup),
    ) -> bool {
        if !self.owns_top(origin) {
            return false;
        }
        let Some(mut frame) = self.stack.pop() else {
            return false;
        };
        finish(&mut frame.markup);
        self.attach(Some(frame.origin), frame.markup, frame.anchor);
        true
    }

    /// Closes every consecutive top frame opened by `origin`.
    pub fn leave_all(&mut self, origin: &'a SourceNode) -> usize {
        let mut closed = 0;
        while self.leave_nesting(origin) {
            closed += 1;
        }
        closed
    }

    /// Whether the top frame was opened by `origin`. The root frame is never owned.
    pub fn owns_top(&self, origin: &SourceNode) -> bool {
        self.stack.len() > 1
            && self
                .stack
                .last()
                .is_some_and(|frame| std::ptr::eq(frame.origin, origin))
    }

    pub fn top_markup(&mut self) -> Option<&mut Markup> {
        self.stack.last_mut().map(|frame| &mut frame.markup)
    }

    /// The innermost open markup matching `predicate`.
    pub fn find_markup_mut(
        &mut self,
        predicate: impl Fn(&Markup) -> bool,
    ) -> Option<&mut Markup> {
        self.stack
            .iter_mut()
            .rev()
            .map(|frame| &mut frame.markup)
            .find(|markup| predicate(markup))
    }

    /// Attaches finished markup to the top frame, anchored on `origin`'s primary id.
    pub fn append_child(&mut self, origin: Option<&'a SourceNode>, markup: impl Into<Markup>) {
        let anchor = origin.and_then(SourceNode::primary_id);
        self.attach(origin, markup.into(), anchor);
    }

    /// Emits a bare anchor for `origin`'s primary id, unless it was anchored already.
    pub fn append_anchor(&mut self, origin: &'a SourceNode) {
        if let Some(id) = origin.primary_id() {
            self.anchor_before(origin, id);
        }
    }

    /// Adopts a zero-width marker for `id` into the top frame. An id only counts as seen
    /// once its marker has landed.
    fn anchor_before(&mut self, origin: &SourceNode, id: &str) {
        if self.seen_ids.contains(id) {
            return;
        }
        let placed = self.stack.last_mut().is_some_and(|top| {
            top.markup.takes_markers()
                && top.markup.adopt(Markup::Node(target_marker(id))).is_ok()
        });
        if placed {
            self.seen_ids.insert(id.to_string());
        } else {
            let location = self.location(origin);
            warn!(%location, id, "no place for an anchor here, dropping it");
        }
    }

    fn attach(&mut self, origin: Option<&'a SourceNode>, mut markup: Markup, anchor: Option<&str>) {
        if let (Some(node), Some(id)) = (origin, anchor) {
            if !self.seen_ids.contains(id) {
                if markup.anchor(id) {
                    self.seen_ids.insert(id.to_string());
                } else {
                    self.anchor_before(node, id);
                }
            }
        }

        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Err(rejected) = top.markup.adopt(markup) {
            let location = match origin {
                Some(node) => self.location(node),
                None => self.doc_id.to_string(),
            };
            warn!(%location, "dropping content that cannot be nested here: {rejected:?}");
        }
    }

    /// Pushes a context scope owned by `owner`.
    pub fn contextualize(&mut self, owner: &'a SourceNode, handlers: Vec<(NodeKind, Handler)>) {
        self.scopes.push(Scope::new(owner, handlers));
    }

    /// Looks `key` up from the innermost scope outwards.
    pub fn context(&self, key: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.data.get(key))
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context(key).and_then(Value::as_str)
    }

    /// Writes `key` into the innermost scope.
    pub fn set_context(&mut self, key: &str, value: impl Into<Value>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.data.insert(key.to_string(), value.into());
        }
    }

    /// Mutable access to `key` in the innermost scope that holds it.
    pub fn context_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.data.get_mut(key))
    }

    /// Data of the scope `owner` pushed, ignoring every other scope.
    pub fn scope_data(&self, owner: &SourceNode) -> Option<&Map<String, Value>> {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.is_owned_by(owner))
            .map(|scope| &scope.data)
    }

    pub fn scope_value(&self, owner: &SourceNode, key: &str) -> Option<&Value> {
        self.scope_data(owner).and_then(|data| data.get(key))
    }

    /// Front-matter entry; the first write of a key wins.
    pub fn set_metadata_default(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata
            .entry(key.to_string())
            .or_insert_with(|| value.into());
    }

    /// `file:line` of `node`, or of its nearest positioned ancestor.
    pub fn location(&self, node: &SourceNode) -> String {
        node.position
            .as_ref()
            .or_else(|| {
                self.ancestors
                    .iter()
                    .rev()
                    .find_map(|ancestor| ancestor.position.as_ref())
            })
            .map(ToString::to_string)
            .unwrap_or_else(|| self.doc_id.to_string())
    }

    /// Logs a per-node problem with its source location.
    pub fn warn(&self, node: &SourceNode, message: &str) {
        warn!(location = %self.location(node), kind = %node.kind, "{message}");
    }

    pub fn missing_attribute(&self, node: &SourceNode, attribute: &str) -> TranslateError {
        TranslateError::MissingAttribute {
            kind: node.kind.to_string(),
            attribute: attribute.to_string(),
            location: self.location(node),
        }
    }

    /// Output link for a local or external image.
    pub fn add_image(&self, uri: &str) -> String {
        self.env
            .assets()
            .add_image(&self.env.pathfinder, self.doc_id, self.source_path, uri)
    }

    /// Output link for a downloadable file.
    pub fn add_download(&self, target: &str) -> String {
        self.env
            .assets()
            .add_download(&self.env.pathfinder, self.doc_id, self.source_path, target)
    }
}
