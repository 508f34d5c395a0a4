use super::{TreeMetadata, Visitor};
use crate::ast::Node;

/// Measures the deepest dispatch path
pub struct DepthProbe;

impl Visitor for DepthProbe {
    fn enter(&mut self, node: &Node, depth: usize, metadata: &mut TreeMetadata) -> bool {
        metadata.max_depth = metadata.max_depth.max(depth);
        !node.verbatim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::ast::Kind;

    #[test]
    fn test_max_depth() {
        let leaf = Node::leaf(Kind::Cbase);
        assert_eq!(Analyzer::new().add(DepthProbe).analyze(&leaf).max_depth, 1);

        let konst = Node::new(Kind::Const, vec![leaf.into(), "Foo".into()]);
        let array = Node::new(Kind::Array, vec![konst.into(), Node::leaf(Kind::Nil).into()]);
        assert_eq!(Analyzer::new().add(DepthProbe).analyze(&array).max_depth, 3);
    }

    #[test]
    fn test_verbatim_subtree_is_one_level() {
        let inner = Node::new(Kind::Array, vec![Node::leaf(Kind::Nil).into()]);
        let root = Node::new(Kind::Array, vec![inner.verbatim().into()]);
        assert_eq!(Analyzer::new().add(DepthProbe).analyze(&root).max_depth, 2);
    }
}
