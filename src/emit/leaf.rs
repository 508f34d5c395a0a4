use super::compose::{float_at, int_at, name_at};
use super::{EmitContext, Emitter};
use crate::ast::{Kind, Node};
use crate::error::EmitError;

/// Variable reads: `lvar`, `ivar`, `cvar`, `gvar`.
///
/// The stored name already carries its sigil (`@x`, `@@x`, `$x`), so it is
/// written as is. Children past the first are ignored.
pub struct NameRef;

impl Emitter for NameRef {
    fn name(&self) -> &'static str {
        "NameRef"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let name = name_at(node, 0)?;
        cx.write(name);
        Ok(())
    }
}

/// `cbase`: the top-level namespace, `::`
pub struct RootScope;

impl Emitter for RootScope {
    fn name(&self) -> &'static str {
        "RootScope"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, _node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        cx.write("::");
        Ok(())
    }
}

/// `nil`, `true`, `false`, `self`
pub struct Keyword;

impl Emitter for Keyword {
    fn name(&self) -> &'static str {
        "Keyword"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let keyword = match node.kind {
            Kind::Nil => "nil",
            Kind::True => "true",
            Kind::False => "false",
            Kind::SelfRef => "self",
            _ => return Err(EmitError::malformed(node, "not a keyword kind")),
        };
        cx.write(keyword);
        Ok(())
    }
}

pub struct IntLiteral;

impl Emitter for IntLiteral {
    fn name(&self) -> &'static str {
        "IntLiteral"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let value = int_at(node, 0)?;
        cx.write(&value.to_string());
        Ok(())
    }
}

pub struct FloatLiteral;

impl Emitter for FloatLiteral {
    fn name(&self) -> &'static str {
        "FloatLiteral"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let value = float_at(node, 0)?;
        cx.write(&format_float(value));
        Ok(())
    }
}

pub struct StringLiteral;

impl Emitter for StringLiteral {
    fn name(&self) -> &'static str {
        "StringLiteral"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let value = name_at(node, 0)?;
        cx.write(&quote_string(value));
        Ok(())
    }
}

pub struct SymbolLiteral;

impl Emitter for SymbolLiteral {
    fn name(&self) -> &'static str {
        "SymbolLiteral"
    }

    fn dispatches_children(&self) -> bool {
        false
    }

    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError> {
        let name = name_at(node, 0)?;
        cx.write(":");
        if is_bare_symbol(name) {
            cx.write(name);
        } else {
            cx.write(&quote_string(name));
        }
        Ok(())
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "Float::NAN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Float::INFINITY".to_string()
        } else {
            "-Float::INFINITY".to_string()
        }
    } else {
        // Debug keeps the fractional part ("1.0"), which Ruby needs to read a Float
        format!("{:?}", value)
    }
}

/// Double-quoted Ruby string literal
pub(crate) fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\0' => out.push_str("\\0"),
            // Interpolation openers
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "!=", "<", ">", "<=", ">=", "<=>", "===", "=~", "!~",
    "!", "[]", "[]=", "<<", ">>", "&", "|", "^", "~", "+@", "-@",
];

/// Whether `:name` reads back as the same symbol without quotes
fn is_bare_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }

    let ident = name
        .strip_prefix("@@")
        .or_else(|| name.strip_prefix('@'))
        .or_else(|| name.strip_prefix('$'))
        .unwrap_or(name);
    let sigiled = ident.len() != name.len();

    // Only plain method names may end in ?, ! or =
    let ident = if sigiled {
        ident
    } else {
        ident
            .strip_suffix(['?', '!', '='])
            .unwrap_or(ident)
    };

    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
