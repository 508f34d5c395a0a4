//! Ruby unparser core.
//!
//! Renders a typed Ruby syntax tree back to source text. Each node kind is
//! routed through a [`Registry`] to the [`Emitter`] responsible for it;
//! emitters compose child output with the helpers in [`emit::compose`], and
//! constructs better copied than re-synthesized are reproduced verbatim from
//! their source span.
//!
//! ```
//! use ruby_unparse::{unparse, Kind, Node};
//!
//! let cbase = Node::leaf(Kind::Cbase);
//! let konst = Node::new(Kind::Const, vec![cbase.into(), "Foo".into()]);
//! assert_eq!(unparse(&konst).unwrap(), "::Foo");
//! ```

pub mod analyze;
pub mod ast;
pub mod emit;
pub mod error;
pub mod input;
mod pipeline;
pub mod tracing_config;

pub use ast::{Child, Kind, Literal, Node, Position, Span};
pub use emit::{dispatch, Buffer, EmitContext, Emitter, Mapping, Output, Registry, RegistryBuilder};
pub use error::{EmitError, LoadError, RegistryError, SpanError, UnparseError};
pub use input::{Document, JsonLoader, Loader};
pub use pipeline::{Options, Pipeline, UnparseResult};

/// Unparse a tree with the built-in registry.
pub fn unparse(root: &Node) -> Result<String, EmitError> {
    Ok(Pipeline::standard().compile(root)?.code)
}

/// Load a JSON tree document and unparse it with the built-in registry.
pub fn unparse_str(document: &str) -> Result<String, UnparseError> {
    let document = JsonLoader::new().load(document)?;
    Ok(Pipeline::standard().compile_document(&document)?.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparse_str() {
        let code = unparse_str(
            r#"{ "source": "@a = $b",
                 "root": { "type": "ivasgn", "children": ["@a", { "type": "gvar", "children": ["$b"] }] } }"#,
        )
        .unwrap();
        assert_eq!(code, "@a = $b");
    }

    #[test]
    fn test_unparse_str_load_error() {
        let err = unparse_str("{").unwrap_err();
        assert!(matches!(err, UnparseError::Load(LoadError::Json(_))));
    }

    #[test]
    fn test_unparse_str_emit_error() {
        let err = unparse_str(r#"{ "root": { "type": "heredoc" } }"#).unwrap_err();
        assert!(matches!(
            err,
            UnparseError::Emit(EmitError::MissingSourceSpan { kind: Kind::Heredoc })
        ));
    }
}
