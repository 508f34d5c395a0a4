use thiserror::Error;

use crate::ast::{Kind, Span};

/// Invalid byte range for a [`Span`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    #[error("span {start}..{end} is out of bounds for source of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("span {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// Error raised while emitting a tree.
///
/// None of these are recoverable by retrying: emission is a pure function of
/// the tree and the registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmitError {
    /// The registry has no emitter for this kind. Always a coverage defect.
    #[error("no emitter registered for node kind `{kind}`")]
    UnknownKind { kind: Kind, span: Option<Span> },

    /// Source-text emission was requested for a node without a span.
    #[error("node of kind `{kind}` has no source span to copy")]
    MissingSourceSpan { kind: Kind },

    /// The node's children do not have the shape its emitter expects.
    #[error("malformed `{kind}` node: {message}")]
    MalformedNode {
        kind: Kind,
        message: String,
        span: Option<Span>,
    },

    #[error("tree is deeper than the configured limit of {limit} levels")]
    DepthLimitExceeded { limit: usize, span: Option<Span> },
}

impl EmitError {
    pub fn malformed(node: &crate::ast::Node, message: impl Into<String>) -> Self {
        EmitError::MalformedNode {
            kind: node.kind,
            message: message.into(),
            span: node.span.clone(),
        }
    }

    /// Source location of the offending node, when known
    pub fn span(&self) -> Option<&Span> {
        match self {
            EmitError::UnknownKind { span, .. }
            | EmitError::MalformedNode { span, .. }
            | EmitError::DepthLimitExceeded { span, .. } => span.as_ref(),
            EmitError::MissingSourceSpan { .. } => None,
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            EmitError::UnknownKind { kind, .. } => Some(format!(
                "register an emitter for '{kind}', or mark the node verbatim to copy its source"
            )),
            EmitError::MissingSourceSpan { .. } => {
                Some("give the node a span, or drop its verbatim flag".to_string())
            }
            EmitError::DepthLimitExceeded { .. } => {
                Some("raise the limit with --max-depth".to_string())
            }
            EmitError::MalformedNode { .. } => None,
        }
    }
}

/// Error assembling a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("kind `{kind}` is already handled by `{existing}`, refusing to register `{incoming}`")]
    DuplicateRegistration {
        kind: Kind,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("no emitter registered for kinds: {}", join_kinds(.0))]
    MissingKinds(Vec<Kind>),
}

fn join_kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error reading a tree document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid node at {path}: {error}")]
    InvalidNode {
        path: String,
        #[source]
        error: serde_json::Error,
    },

    #[error("unsupported child at {path}: {found}")]
    UnsupportedChild { path: String, found: &'static str },

    #[error("invalid span on node at {path}: {error}")]
    InvalidSpan {
        path: String,
        #[source]
        error: SpanError,
    },
}

/// Error from loading or unparsing a document
#[derive(Debug, Error)]
pub enum UnparseError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// One source line to show under an error, with the columns to underline
struct Snippet {
    line_number: usize,
    text: String,
    col: usize,
    len: usize,
}

impl UnparseError {
    /// Render the error with source context (no color).
    ///
    /// `document` is the raw tree document the error came from; it is used to
    /// locate JSON syntax errors. Emission errors carry their own source
    /// through the node span.
    pub fn render(&self, document: &str, filename: &str) -> String {
        self.render_inner(document, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, document: &str, filename: &str) -> String {
        self.render_inner(document, filename, true)
    }

    fn snippet(&self, document: &str) -> Option<Snippet> {
        match self {
            UnparseError::Load(LoadError::Json(err)) if err.line() > 0 => {
                let text = document.lines().nth(err.line() - 1)?.to_string();
                Some(Snippet {
                    line_number: err.line(),
                    text,
                    col: err.column().saturating_sub(1),
                    len: 1,
                })
            }
            UnparseError::Emit(err) => {
                let span = err.span()?;
                let start = span.start_position();
                let end = span.end_position();
                let text = span.source().lines().nth(start.line)?.to_string();
                let len = if end.line == start.line {
                    end.col.saturating_sub(start.col).max(1)
                } else {
                    text.chars().count().saturating_sub(start.col).max(1)
                };
                Some(Snippet {
                    line_number: start.line + 1,
                    text,
                    col: start.col,
                    len,
                })
            }
            UnparseError::Load(_) => None,
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            UnparseError::Emit(err) => err.help(),
            UnparseError::Load(LoadError::InvalidSpan { .. }) => {
                Some("spans are [start, end] byte offsets into \"source\"".to_string())
            }
            UnparseError::Load(LoadError::UnsupportedChild { .. }) => Some(
                "children are nodes (objects), strings, numbers or null".to_string(),
            ),
            UnparseError::Load(_) => None,
        }
    }

    fn render_inner(&self, document: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let snippet = self.snippet(document);

        let mut output = String::new();
        output.push('\n');

        let location = match &snippet {
            Some(s) => format!("{}:{}:{}", filename, s.line_number, s.col + 1),
            None => filename.to_string(),
        };
        output.push_str(&format!(" {}file:{} {}\n", dim, reset, location));
        output.push_str(&format!("{}error:{} {}\n", red, reset, self));

        if let Some(s) = snippet {
            let width = format!("{}", s.line_number).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim,
                s.line_number,
                reset,
                s.text,
                width = width
            ));
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim,
                "",
                reset,
                " ".repeat(s.col),
                red,
                "^".repeat(s.len),
                reset,
                width = width
            ));
        }

        if let Some(help) = self.help() {
            output.push('\n');
            output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help));
        }

        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_registry_error_messages() {
        let err = RegistryError::MissingKinds(vec![Kind::Lvar, Kind::Cbase]);
        assert_eq!(err.to_string(), "no emitter registered for kinds: lvar, cbase");

        let err = RegistryError::DuplicateRegistration {
            kind: Kind::Ivar,
            existing: "NameRef",
            incoming: "SourceText",
        };
        assert_eq!(
            err.to_string(),
            "kind `ivar` is already handled by `NameRef`, refusing to register `SourceText`"
        );
    }

    #[test]
    fn test_render_with_span() {
        let source: Arc<str> = Arc::from("foo = bar(1)\n");
        let span = Span::new(source, 6, 12).unwrap();
        let err = UnparseError::from(EmitError::UnknownKind {
            kind: Kind::Send,
            span: Some(span),
        });

        let rendered = err.render("{}", "tree.json");
        assert!(rendered.contains(" file: tree.json:1:7"));
        assert!(rendered.contains("error: no emitter registered for node kind `send`"));
        assert!(rendered.contains(" 1 | foo = bar(1)"));
        assert!(rendered.contains("   |       ^^^^^^"));
        assert!(rendered.contains(" help: register an emitter for 'send'"));
    }

    #[test]
    fn test_render_without_span() {
        let err = UnparseError::from(EmitError::MissingSourceSpan { kind: Kind::Dstr });
        let rendered = err.render("", "tree.json");
        assert!(rendered.contains(" file: tree.json\n"));
        assert!(rendered.contains("error: node of kind `dstr` has no source span to copy"));
        assert!(!rendered.contains('^'));
    }

    #[test]
    fn test_render_json_error() {
        let document = "{\n  \"source\": 1,\n}";
        let err = serde_json::from_str::<serde_json::Value>(document).unwrap_err();
        let rendered = UnparseError::from(LoadError::from(err)).render(document, "bad.json");
        assert!(rendered.contains("bad.json:3:"));
        assert!(rendered.contains("error: invalid tree document"));
    }
}
