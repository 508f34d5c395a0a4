use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::ast::{Child, Kind, Literal, Node, Span};
use crate::error::LoadError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawDocument {
    #[serde(default)]
    pub source: String,
    pub root: RawNode,
}

/// Node as it appears in the document, before spans are resolved.
///
/// Children stay as raw JSON values so a bad nested node is reported with
/// its path rather than as an opaque mismatch.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawNode {
    #[serde(rename = "type")]
    kind: Kind,
    #[serde(default)]
    children: Vec<Value>,
    #[serde(default)]
    span: Option<[usize; 2]>,
    #[serde(default)]
    verbatim: bool,
}

/// Turns raw nodes into [`Node`]s whose spans share one source.
pub(super) struct TreeBuilder {
    source: Arc<str>,
}

impl TreeBuilder {
    pub fn new(source: Arc<str>) -> Self {
        Self { source }
    }

    pub fn build(&self, raw: RawNode, path: &str) -> Result<Node, LoadError> {
        let span = match raw.span {
            Some([start, end]) => Some(Span::new(self.source.clone(), start, end).map_err(
                |error| LoadError::InvalidSpan {
                    path: path.to_string(),
                    error,
                },
            )?),
            None => None,
        };

        let children = raw
            .children
            .into_iter()
            .enumerate()
            .map(|(i, value)| self.build_child(value, &format!("{path}.children[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node {
            kind: raw.kind,
            children,
            span,
            verbatim: raw.verbatim,
        })
    }

    fn build_child(&self, value: Value, path: &str) -> Result<Child, LoadError> {
        let literal = match value {
            Value::Object(_) => {
                let raw: RawNode =
                    serde_json::from_value(value).map_err(|error| LoadError::InvalidNode {
                        path: path.to_string(),
                        error,
                    })?;
                return self.build(raw, path).map(Child::Node);
            }
            Value::String(s) => Literal::Str(s),
            Value::Null => Literal::Nil,
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Literal::Int(i),
                (None, Some(f)) if !n.is_u64() => Literal::Float(f),
                _ => return Err(unsupported(path, "integer outside the 64-bit signed range")),
            },
            Value::Bool(_) => return Err(unsupported(path, "boolean")),
            Value::Array(_) => return Err(unsupported(path, "array")),
        };
        Ok(Child::Literal(literal))
    }
}

fn unsupported(path: &str, found: &'static str) -> LoadError {
    LoadError::UnsupportedChild {
        path: path.to_string(),
        found,
    }
}
