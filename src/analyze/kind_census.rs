use super::{TreeMetadata, Visitor};
use crate::ast::Node;

/// Records which kinds will be dispatched and how many nodes there are
pub struct KindCensus;

impl Visitor for KindCensus {
    fn enter(&mut self, node: &Node, _depth: usize, metadata: &mut TreeMetadata) -> bool {
        metadata.node_count += 1;
        if node.verbatim {
            return false;
        }
        metadata.kinds_used.insert(node.kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::ast::{Child, Kind};

    #[test]
    fn test_counts_kinds_and_nodes() {
        let root = Node::new(
            Kind::Array,
            vec![
                Node::new(Kind::Lvar, vec!["a".into()]).into(),
                Node::new(Kind::Lvar, vec!["b".into()]).into(),
                Child::from(Node::new(Kind::Str, vec!["skip".into()]).verbatim()),
            ],
        );

        let metadata = Analyzer::new().add(KindCensus).analyze(&root).clone();
        assert_eq!(metadata.node_count, 4);
        assert!(metadata.uses(Kind::Array));
        assert!(metadata.uses(Kind::Lvar));
        // Verbatim nodes never reach their kind's emitter
        assert!(!metadata.uses(Kind::Str));
    }
}
