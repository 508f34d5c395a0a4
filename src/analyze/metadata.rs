use std::collections::BTreeSet;

use serde::Serialize;

use crate::ast::Kind;

/// Facts about the part of a tree that emission will visit.
///
/// Subtrees under `verbatim` nodes are copied from source and never
/// dispatched, so they are not counted. When the analysis runs against a
/// registry, neither are children of nodes whose emitter writes them out
/// without dispatching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeMetadata {
    pub kinds_used: BTreeSet<Kind>,
    pub node_count: usize,
    /// Levels on the deepest path; a lone root is 1
    pub max_depth: usize,
    pub verbatim_nodes: usize,
}

impl TreeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uses(&self, kind: Kind) -> bool {
        self.kinds_used.contains(&kind)
    }
}
