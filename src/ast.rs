use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::error::SpanError;
use crate::input::positions::byte_to_position;

/// Syntactic category of a node.
///
/// The set is closed: every variant must have an emitter in the standard
/// registry, and `Kind as usize` indexes the registry table. Names follow the
/// Ruby AST type tags (`lvar`, `cbase`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    // Named slots
    Lvar,
    Ivar,
    Cvar,
    Gvar,

    // Scope
    Cbase,
    Const,

    // Keywords
    Nil,
    True,
    False,
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    SelfRef,

    // Literals
    Int,
    Float,
    Str,
    Sym,

    // Collections
    Array,
    Hash,
    Pair,
    Splat,
    Begin,

    // Assignment
    Lvasgn,
    Ivasgn,
    Cvasgn,
    Gvasgn,

    // Calls
    Send,

    // Reproduced from source
    Dstr,
    Regexp,
    Xstr,
    Heredoc,
}

impl Kind {
    /// Stable lowercase name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Literal scalar stored directly in a node's children.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Nil,
}

/// One entry in a node's ordered children.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Literal(Literal),
}

impl Child {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Literal(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Child::Literal(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Child::Literal(Literal::Nil))
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Literal(Literal::Str(s.to_string()))
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Literal(Literal::Str(s))
    }
}

impl From<i64> for Child {
    fn from(n: i64) -> Self {
        Child::Literal(Literal::Int(n))
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Literal(Literal::Float(n))
    }
}

/// Immutable syntax tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Kind,
    pub children: Vec<Child>,
    pub span: Option<Span>,
    /// Render from source text instead of re-synthesizing
    pub verbatim: bool,
}

impl Node {
    pub fn new(kind: Kind, children: Vec<Child>) -> Self {
        Self {
            kind,
            children,
            span: None,
            verbatim: false,
        }
    }

    /// Node without children (`cbase`, `nil`, `self`, ...)
    pub fn leaf(kind: Kind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Mark the node for verbatim reproduction from its span.
    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

/// Line/column location of a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub col: usize,
}

/// Byte range into the original source text.
///
/// Holds a shared handle to the source so the range can always be resolved
/// back to text. Construction validates the range, so `to_source_text` never
/// fails.
#[derive(Clone, PartialEq, Eq)]
pub struct Span {
    source: Arc<str>,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(source: Arc<str>, start: usize, end: usize) -> Result<Self, SpanError> {
        if start > end || end > source.len() {
            return Err(SpanError::OutOfBounds {
                start,
                end,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(SpanError::NotCharBoundary { start, end });
        }
        Ok(Self { source, start, end })
    }

    /// Span covering the whole source.
    pub fn full(source: Arc<str>) -> Self {
        let end = source.len();
        Self { source, start: 0, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    /// The exact original substring covered by this span.
    pub fn to_source_text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    pub fn start_position(&self) -> Position {
        byte_to_position(&self.source, self.start)
    }

    pub fn end_position(&self) -> Position {
        byte_to_position(&self.source, self.end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in Kind::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(Kind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(Kind::SelfRef.as_str(), "self");
    }

    #[test]
    fn test_span_text() {
        let source: Arc<str> = Arc::from("foo = ::Bar");
        let span = Span::new(source.clone(), 6, 11).unwrap();
        assert_eq!(span.to_source_text(), "::Bar");
        assert_eq!(Span::full(source).to_source_text(), "foo = ::Bar");
    }

    #[test]
    fn test_span_rejects_bad_ranges() {
        let source: Arc<str> = Arc::from("café");
        assert!(matches!(
            Span::new(source.clone(), 2, 10),
            Err(SpanError::OutOfBounds { .. })
        ));
        assert!(matches!(
            Span::new(source.clone(), 3, 1),
            Err(SpanError::OutOfBounds { .. })
        ));
        // 'é' occupies bytes 3..5
        assert!(matches!(
            Span::new(source, 0, 4),
            Err(SpanError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn test_span_positions() {
        let source: Arc<str> = Arc::from("a = 1\nbb = 2");
        let span = Span::new(source, 6, 8).unwrap();
        assert_eq!(span.start_position(), Position { byte: 6, line: 1, col: 0 });
        assert_eq!(span.end_position(), Position { byte: 8, line: 1, col: 2 });
    }

    #[test]
    fn test_child_accessors() {
        let node = Node::new(Kind::Lvar, vec!["x".into(), Child::Literal(Literal::Nil)]);
        assert_eq!(node.children()[0].as_str(), Some("x"));
        assert!(node.children()[1].is_nil());
        assert!(node.children()[0].as_node().is_none());
    }
}
