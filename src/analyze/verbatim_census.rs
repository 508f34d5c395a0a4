use super::{TreeMetadata, Visitor};
use crate::ast::Node;

/// Counts nodes annotated for verbatim source reproduction
pub struct VerbatimCensus;

impl Visitor for VerbatimCensus {
    fn enter(&mut self, node: &Node, _depth: usize, metadata: &mut TreeMetadata) -> bool {
        if node.verbatim {
            metadata.verbatim_nodes += 1;
            return false;
        }
        true
    }
}
