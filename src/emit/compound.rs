use super::compose::{joined, name_at, node_at, nodes_from, optional_node_at, parenthesized};
use super::{EmitContext, Emitter};
use crate::ast::{Kind, Node};
use crate::error::EmitError;

/// `const`: `[scope | nil, name]`
///
/// `Foo`, `::Foo` (scope is `cbase`, which writes the `::` itself) or
/// `Outer::Foo`.
pub struct ConstantRef;

impl Emitter for ConstantRef {
    fn name(&self) -> &'static str {
        "ConstantRef"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let name = name_at(node, 1)?;
        if let Some(scope) = optional_node_at(node, 0)? {
            cx.dispatch(scope)?;
            if scope.kind != Kind::Cbase {
                cx.write("::");
            }
        }
        cx.write(name);
        Ok(())
    }
}

/// `array`: `[a, b]`
pub struct ArrayLiteral;

impl Emitter for ArrayLiteral {
    fn name(&self) -> &'static str {
        "ArrayLiteral"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let elements = nodes_from(node, 0)?;
        parenthesized(cx, "[", "]", |cx| joined(cx, elements, ", "))
    }
}

/// `hash`: `{}` or `{ a => b, **rest }`
pub struct HashLiteral;

impl Emitter for HashLiteral {
    fn name(&self) -> &'static str {
        "HashLiteral"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let entries = nodes_from(node, 0)?;
        if entries.is_empty() {
            cx.write("{}");
            return Ok(());
        }
        parenthesized(cx, "{ ", " }", |cx| joined(cx, entries, ", "))
    }
}

/// `pair`: `key => value`
pub struct HashPair;

impl Emitter for HashPair {
    fn name(&self) -> &'static str {
        "HashPair"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let key = node_at(node, 0)?;
        let value = node_at(node, 1)?;
        cx.dispatch(key)?;
        cx.write(" => ");
        cx.dispatch(value)
    }
}

/// `splat`: `*value`, or a bare `*` when anonymous
pub struct SplatArg;

impl Emitter for SplatArg {
    fn name(&self) -> &'static str {
        "SplatArg"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        cx.write("*");
        match optional_node_at(node, 0)? {
            Some(value) => cx.dispatch(value),
            None => Ok(()),
        }
    }
}

/// `begin`: explicit grouping, `(a; b)`
pub struct ParenGroup;

impl Emitter for ParenGroup {
    fn name(&self) -> &'static str {
        "ParenGroup"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let statements = nodes_from(node, 0)?;
        parenthesized(cx, "(", ")", |cx| joined(cx, statements, "; "))
    }
}

/// `lvasgn`, `ivasgn`, `cvasgn`, `gvasgn`: `[name, value?]`
///
/// Without a value only the target is written, which is how assignment
/// targets appear inside multiple assignment.
pub struct Assignment;

impl Emitter for Assignment {
    fn name(&self) -> &'static str {
        "Assignment"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let target = name_at(node, 0)?;
        cx.write(target);
        if let Some(value) = optional_node_at(node, 1)? {
            cx.write(" = ");
            cx.dispatch(value)?;
        }
        Ok(())
    }
}

/// `send`: `[receiver | nil, method, args...]`
///
/// Always uses the dotted, parenthesized call form (`a.+(b)`), which reads
/// back the same for operator methods without needing precedence rules.
pub struct MethodCall;

impl Emitter for MethodCall {
    fn name(&self) -> &'static str {
        "MethodCall"
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let method = name_at(node, 1)?;
        let receiver = optional_node_at(node, 0)?;
        let args = nodes_from(node, 2)?;

        if let Some(receiver) = receiver {
            cx.dispatch(receiver)?;
            cx.write(".");
        }
        cx.write(method);

        if args.is_empty() {
            return Ok(());
        }
        parenthesized(cx, "(", ")", |cx| joined(cx, args, ", "))
    }
}
