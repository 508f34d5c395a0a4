//! Tree-to-text emission.
//!
//! A [`Registry`] maps every [`Kind`] to the [`Emitter`] that renders it.
//! [`dispatch`] is the single recursive entry point: it resolves the node's
//! emitter and hands it an [`EmitContext`], through which the emitter writes
//! fragments and dispatches children. Writes land in the buffer in exactly
//! the order emitters issue them.

pub mod compose;
mod compound;
mod leaf;
mod output;
mod registry;
mod source_text;

pub use compound::{
    ArrayLiteral, Assignment, ConstantRef, HashLiteral, HashPair, MethodCall, ParenGroup, SplatArg,
};
pub use leaf::{
    FloatLiteral, IntLiteral, Keyword, NameRef, RootScope, StringLiteral, SymbolLiteral,
};
pub use output::{Buffer, Mapping, Output};
pub use registry::{Registry, RegistryBuilder};
pub use source_text::SourceText;

use std::any::TypeId;

use tracing::{debug, trace};

use crate::ast::{Kind, Node};
use crate::error::EmitError;

/// Default bound on tree depth during emission
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Renders nodes of one or more kinds.
///
/// Emitters hold no state of their own, so one instance serves every node of
/// its kinds, across threads.
pub trait Emitter: Send + Sync + 'static {
    /// Name used in diagnostics and registry listings
    fn name(&self) -> &'static str;

    /// Write `node` through `cx`, dispatching children as needed.
    fn render(&self, node: &Node, cx: &mut EmitContext<'_>) -> Result<(), EmitError>;

    /// Whether `render` may dispatch the node's children.
    ///
    /// Emitters that write only literals or source text return `false`, and
    /// pre-flight analysis then ignores whatever sits below their nodes.
    fn dispatches_children(&self) -> bool {
        true
    }

    /// Identity of the concrete emitter type. Two emitters are the same
    /// registration only if these match; names are for display.
    fn emitter_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// State of one emission: the registry, the buffer, and the recursion depth.
pub struct EmitContext<'a> {
    registry: &'a Registry,
    buffer: &'a mut dyn Buffer,
    depth: usize,
    max_depth: usize,
}

impl<'a> EmitContext<'a> {
    pub fn new(registry: &'a Registry, buffer: &'a mut dyn Buffer) -> Self {
        Self {
            registry,
            buffer,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of dispatches currently on the stack
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Append a literal fragment.
    pub fn write(&mut self, fragment: &str) {
        self.buffer.append(fragment);
    }

    /// Render `node` with the emitter registered for its kind.
    ///
    /// Nodes annotated `verbatim` go straight to [`SourceText`]. Lookup
    /// failures are reported before anything is written for the node.
    pub fn dispatch(&mut self, node: &Node) -> Result<(), EmitError> {
        if self.depth >= self.max_depth {
            return Err(EmitError::DepthLimitExceeded {
                limit: self.max_depth,
                span: node.span.clone(),
            });
        }

        let emitter = self.resolve(node)?;
        trace!(
            kind = node.kind.as_str(),
            emitter = emitter.name(),
            depth = self.depth,
            "dispatch"
        );

        if let Some(span) = &node.span {
            self.buffer.mark(span);
        }

        self.depth += 1;
        let result = emitter.render(node, self);
        self.depth -= 1;
        result
    }

    fn resolve(&self, node: &Node) -> Result<&'a dyn Emitter, EmitError> {
        if node.verbatim {
            debug!(kind = node.kind.as_str(), "verbatim node, copying source text");
            return Ok(&SourceText);
        }
        self.registry.get(node.kind).ok_or_else(|| EmitError::UnknownKind {
            kind: node.kind,
            span: node.span.clone(),
        })
    }
}

/// Emit `node` into `buffer` using `registry`.
pub fn dispatch(registry: &Registry, node: &Node, buffer: &mut dyn Buffer) -> Result<(), EmitError> {
    EmitContext::new(registry, buffer).dispatch(node)
}

/// Kinds handled by `emitter` in `registry`, in declaration order.
pub fn kinds_for<'r>(registry: &'r Registry, emitter: &str) -> impl Iterator<Item = Kind> + 'r {
    let emitter = emitter.to_string();
    registry
        .entries()
        .filter(move |(_, e)| e.name() == emitter)
        .map(|(kind, _)| kind)
}
