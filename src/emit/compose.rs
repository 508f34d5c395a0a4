//! Helpers shared by emitters: delimiters, joins, and child accessors.

use super::EmitContext;
use crate::ast::{Child, Literal, Node};
use crate::error::EmitError;

/// Write `open`, run `body`, write `close`.
///
/// Buffers are not transactional: if `body` fails, `open` has already been
/// written and `close` is not.
pub fn parenthesized<F>(
    cx: &mut EmitContext<'_>,
    open: &str,
    close: &str,
    body: F,
) -> Result<(), EmitError>
where
    F: FnOnce(&mut EmitContext<'_>) -> Result<(), EmitError>,
{
    cx.write(open);
    body(cx)?;
    cx.write(close);
    Ok(())
}

/// Dispatch each node in order with `delimiter` between consecutive ones.
pub fn joined<'n, I>(cx: &mut EmitContext<'_>, nodes: I, delimiter: &str) -> Result<(), EmitError>
where
    I: IntoIterator<Item = &'n Node>,
{
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            cx.write(delimiter);
        }
        cx.dispatch(node)?;
    }
    Ok(())
}

pub fn children(node: &Node) -> &[Child] {
    &node.children
}

/// Children that are nodes, skipping literals
pub fn child_nodes(node: &Node) -> impl Iterator<Item = &Node> {
    node.children.iter().filter_map(Child::as_node)
}

/// Children from `start` on, all of which must be nodes.
///
/// A literal in that range is a malformed node, never silently dropped.
pub fn nodes_from(node: &Node, start: usize) -> Result<Vec<&Node>, EmitError> {
    node.children
        .iter()
        .enumerate()
        .skip(start)
        .map(|(i, child)| {
            child.as_node().ok_or_else(|| {
                EmitError::malformed(node, format!("expected a node at child {i}, found a literal"))
            })
        })
        .collect()
}

pub fn node_at(node: &Node, index: usize) -> Result<&Node, EmitError> {
    match node.children.get(index) {
        Some(Child::Node(child)) => Ok(child),
        Some(Child::Literal(_)) => Err(EmitError::malformed(
            node,
            format!("expected a node at child {index}, found a literal"),
        )),
        None => Err(missing(node, index)),
    }
}

/// Node at `index`, or `None` if the slot is `nil` or absent
pub fn optional_node_at(node: &Node, index: usize) -> Result<Option<&Node>, EmitError> {
    match node.children.get(index) {
        None | Some(Child::Literal(Literal::Nil)) => Ok(None),
        Some(Child::Node(child)) => Ok(Some(child)),
        Some(Child::Literal(_)) => Err(EmitError::malformed(
            node,
            format!("expected a node or nil at child {index}"),
        )),
    }
}

pub fn name_at(node: &Node, index: usize) -> Result<&str, EmitError> {
    match node.children.get(index) {
        Some(Child::Literal(Literal::Str(name))) => Ok(name),
        Some(_) => Err(EmitError::malformed(
            node,
            format!("expected a string at child {index}"),
        )),
        None => Err(missing(node, index)),
    }
}

pub fn int_at(node: &Node, index: usize) -> Result<i64, EmitError> {
    match node.children.get(index) {
        Some(Child::Literal(Literal::Int(n))) => Ok(*n),
        Some(_) => Err(EmitError::malformed(
            node,
            format!("expected an integer at child {index}"),
        )),
        None => Err(missing(node, index)),
    }
}

/// Float at `index`; integer literals are widened
pub fn float_at(node: &Node, index: usize) -> Result<f64, EmitError> {
    match node.children.get(index) {
        Some(Child::Literal(Literal::Float(n))) => Ok(*n),
        Some(Child::Literal(Literal::Int(n))) => Ok(*n as f64),
        Some(_) => Err(EmitError::malformed(
            node,
            format!("expected a float at child {index}"),
        )),
        None => Err(missing(node, index)),
    }
}

fn missing(node: &Node, index: usize) -> EmitError {
    EmitError::malformed(
        node,
        format!(
            "expected at least {} children, found {}",
            index + 1,
            node.children.len()
        ),
    )
}
