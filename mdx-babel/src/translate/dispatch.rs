//! Handler registration and per-kind dispatch chains.

use super::Translator;
use crate::error::TranslateError;
use crate::source::{NodeKind, SourceNode};
use std::collections::HashMap;

/// What the walker does after a node was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Walk the children, then dispatch the leave event.
    Descend,
    /// Ignore the children and the leave event.
    Skip,
    /// Not handled here; try the next handler in the chain.
    Pass,
}

/// Outcome of a leave handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Done,
    /// Not handled here; try the next handler in the chain.
    Pass,
}

pub type EnterFn =
    for<'a> fn(&mut Translator<'a>, &'a SourceNode) -> Result<Visit, TranslateError>;
pub type LeaveFn =
    for<'a> fn(&mut Translator<'a>, &'a SourceNode) -> Result<Departure, TranslateError>;

/// A pair of enter/leave callbacks. A missing callback passes.
#[derive(Clone, Copy)]
pub struct Handler {
    pub enter: Option<EnterFn>,
    pub leave: Option<LeaveFn>,
}

impl Handler {
    pub const fn new(enter: EnterFn, leave: LeaveFn) -> Self {
        Self {
            enter: Some(enter),
            leave: Some(leave),
        }
    }

    pub const fn enter_only(enter: EnterFn) -> Self {
        Self {
            enter: Some(enter),
            leave: None,
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}

/// Static handlers keyed by kind, with each kind's fallback chain resolved up front.
///
/// The chain of a kind lists the handlers of its [`lineage`](NodeKind::lineage), most
/// specific first. Kinds outside the enumeration share the chain of
/// [`NodeKind::Element`] unless they were registered explicitly.
#[derive(Debug, Default, Clone)]
pub struct HandlerTable {
    handlers: HashMap<NodeKind, Handler>,
    chains: HashMap<NodeKind, Vec<Handler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every build starts from.
    pub fn standard() -> Self {
        let mut table = Self::new();
        super::handlers::register_standard(&mut table);
        table
    }

    /// Registers `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<NodeKind>, handler: Handler) {
        self.handlers.insert(kind.into(), handler);
        self.rebuild();
    }

    pub fn contains(&self, kind: &NodeKind) -> bool {
        self.handlers.contains_key(kind)
    }

    fn rebuild(&mut self) {
        let kinds = NodeKind::ALL
            .iter()
            .chain(self.handlers.keys())
            .cloned()
            .collect::<Vec<_>>();
        self.chains = kinds
            .into_iter()
            .map(|kind| {
                let chain = kind
                    .lineage()
                    .iter()
                    .filter_map(|step| self.handlers.get(step).copied())
                    .collect();
                (kind, chain)
            })
            .collect();
    }

    /// Handlers to try for `kind`, most specific first.
    pub fn chain(&self, kind: &NodeKind) -> &[Handler] {
        self.chains
            .get(kind)
            .or_else(|| self.chains.get(&NodeKind::Element))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descend<'a>(_: &mut Translator<'a>, _: &'a SourceNode) -> Result<Visit, TranslateError> {
        Ok(Visit::Descend)
    }

    #[test]
    fn chains_follow_the_lineage() {
        let mut table = HandlerTable::new();
        table.register(NodeKind::Admonition, Handler::enter_only(descend));
        table.register(NodeKind::Element, Handler::enter_only(descend));

        assert_eq!(table.chain(&NodeKind::Note).len(), 2);
        assert_eq!(table.chain(&NodeKind::Paragraph).len(), 1);
        assert_eq!(table.chain(&NodeKind::Text).len(), 0);
    }

    #[test]
    fn unknown_kinds_use_the_generic_chain() {
        let mut table = HandlerTable::new();
        table.register(NodeKind::Element, Handler::enter_only(descend));
        let unknown = NodeKind::from_tag("nbsphinx_cell");
        assert_eq!(table.chain(&unknown).len(), 1);

        table.register(unknown.clone(), Handler::enter_only(descend));
        assert_eq!(table.chain(&unknown).len(), 2);
    }

    #[test]
    fn standard_table_covers_every_enumerated_kind() {
        let table = HandlerTable::standard();
        for kind in NodeKind::ALL {
            assert!(
                !table.chain(kind).is_empty(),
                "no handler chain for {kind}"
            );
        }
    }
}
