use super::{EmitContext, Emitter};
use crate::ast::Node;
use crate::error::EmitError;

/// Copies the node's original source text verbatim.
///
/// Kind and children are never consulted. Used for constructs that are
/// cheaper or safer to reproduce byte-for-byte than to re-synthesize
/// (heredocs, interpolated strings, regexp literals), and for any node the
/// tree builder annotated `verbatim`.
pub struct SourceText;

impl Emitter for SourceText {
    fn name(&self) -> &'static str {
        "SourceText"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let span = node
            .span
            .as_ref()
            .ok_or(EmitError::MissingSourceSpan { kind: node.kind })?;
        cx.write(span.to_source_text());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Kind, Span};
    use crate::emit::{dispatch, Registry};
    use std::sync::Arc;

    fn emit(node: &Node) -> Result<String, EmitError> {
        let mut buf = String::new();
        dispatch(Registry::standard(), node, &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn test_copies_span_for_registered_kinds() {
        let source: Arc<str> = Arc::from("x = \"a#{b}c\"  # note");
        let span = Span::new(source, 4, 12).unwrap();
        // Children are ignored entirely.
        let dstr = Node::new(Kind::Dstr, vec!["not used".into()]).with_span(span);
        assert_eq!(emit(&dstr).unwrap(), "\"a#{b}c\"");
    }

    #[test]
    fn test_verbatim_annotation_overrides_kind() {
        let source: Arc<str> = Arc::from("foo(  1,2 )");
        let span = Span::new(source, 0, 11).unwrap();
        let call = Node::new(Kind::Send, vec!["garbage".into()])
            .with_span(span)
            .verbatim();
        assert_eq!(emit(&call).unwrap(), "foo(  1,2 )");
    }

    #[test]
    fn test_missing_span() {
        let regexp = Node::leaf(Kind::Regexp);
        assert_eq!(
            emit(&regexp).unwrap_err(),
            EmitError::MissingSourceSpan { kind: Kind::Regexp }
        );

        let annotated = Node::new(Kind::Lvar, vec!["x".into()]).verbatim();
        assert_eq!(
            emit(&annotated).unwrap_err(),
            EmitError::MissingSourceSpan { kind: Kind::Lvar }
        );
    }

    #[test]
    fn test_multiline_span() {
        let source: Arc<str> = Arc::from("text = <<~EOS\n  hello\nEOS\n");
        let span = Span::new(source, 7, 26).unwrap();
        let heredoc = Node::leaf(Kind::Heredoc).with_span(span);
        assert_eq!(emit(&heredoc).unwrap(), "<<~EOS\n  hello\nEOS\n");
    }
}
