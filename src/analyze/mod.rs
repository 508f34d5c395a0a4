mod depth_probe;
mod kind_census;
mod metadata;
mod verbatim_census;

pub use depth_probe::DepthProbe;
pub use kind_census::KindCensus;
pub use metadata::TreeMetadata;
pub use verbatim_census::VerbatimCensus;

use crate::ast::{Node, Span};
use crate::emit::Registry;

/// Read-only visitor over the nodes emission will reach
pub trait Visitor {
    /// Called before visiting children. Return `false` to skip children.
    ///
    /// `depth` is 1 for the root.
    fn enter(&mut self, _node: &Node, _depth: usize, _metadata: &mut TreeMetadata) -> bool {
        true
    }

    /// Called after visiting children.
    fn exit(&mut self, _node: &Node, _depth: usize, _metadata: &mut TreeMetadata) {}
}

/// Runs a series of passes over a tree, collecting [`TreeMetadata`]
///
/// With a registry attached, the walk stops below nodes whose emitter never
/// dispatches children, so the passes see what emission will reach.
pub struct Analyzer<'r> {
    passes: Vec<Box<dyn Visitor>>,
    registry: Option<&'r Registry>,
    pub metadata: TreeMetadata,
}

impl<'r> Analyzer<'r> {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            registry: None,
            metadata: TreeMetadata::new(),
        }
    }

    pub fn with_registry(mut self, registry: &'r Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn add<V: Visitor + 'static>(mut self, visitor: V) -> Self {
        self.passes.push(Box::new(visitor));
        self
    }

    pub fn analyze(&mut self, root: &Node) -> &TreeMetadata {
        for pass in &mut self.passes {
            walk(root, self.registry, pass.as_mut(), &mut self.metadata);
        }

        &self.metadata
    }
}

impl Default for Analyzer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create an analyzer with the standard passes
pub fn standard_passes<'r>() -> Analyzer<'r> {
    Analyzer::new()
        .add(KindCensus)
        .add(DepthProbe)
        .add(VerbatimCensus)
}

/// Depth-first, left-to-right walk with an explicit stack, so arbitrarily
/// deep trees can be measured before emission recurses into them.
///
/// Children of a node are skipped when `registry` maps its kind to an emitter
/// that does not dispatch children. Unregistered kinds are descended into.
pub fn walk(
    root: &Node,
    registry: Option<&Registry>,
    visitor: &mut dyn Visitor,
    metadata: &mut TreeMetadata,
) {
    let mut stack: Vec<(&Node, usize, bool)> = vec![(root, 1, false)];

    while let Some((node, depth, exiting)) = stack.pop() {
        if exiting {
            visitor.exit(node, depth, metadata);
            continue;
        }

        let descend = visitor.enter(node, depth, metadata);
        stack.push((node, depth, true));
        if descend && reaches_children(node, registry) {
            let children = node.children.iter().filter_map(|child| child.as_node());
            for child in children.rev() {
                stack.push((child, depth + 1, false));
            }
        }
    }
}

fn reaches_children(node: &Node, registry: Option<&Registry>) -> bool {
    registry
        .and_then(|registry| registry.get(node.kind))
        .is_none_or(|emitter| emitter.dispatches_children())
}

/// Span of the first node (in emission order) matching `predicate`.
///
/// Returns `None` when nothing matches and `Some(None)` when the match has
/// no span.
pub fn find_first<F>(root: &Node, registry: Option<&Registry>, predicate: F) -> Option<Option<Span>>
where
    F: Fn(&Node, usize) -> bool,
{
    struct Finder<F> {
        predicate: F,
        found: Option<Option<Span>>,
    }

    impl<F: Fn(&Node, usize) -> bool> Visitor for Finder<F> {
        fn enter(&mut self, node: &Node, depth: usize, _metadata: &mut TreeMetadata) -> bool {
            if self.found.is_some() || node.verbatim {
                return false;
            }
            if (self.predicate)(node, depth) {
                self.found = Some(node.span.clone());
                return false;
            }
            true
        }
    }

    let mut finder = Finder {
        predicate,
        found: None,
    };
    walk(root, registry, &mut finder, &mut TreeMetadata::new());
    finder.found
}
