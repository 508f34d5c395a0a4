use serde::Serialize;
use tracing::debug;

use crate::analyze::{self, TreeMetadata};
use crate::ast::Node;
use crate::emit::{EmitContext, Mapping, Output, Registry, DEFAULT_MAX_DEPTH};
use crate::error::EmitError;
use crate::input::Document;

/// Emission options
#[derive(Debug, Clone)]
pub struct Options {
    /// Deepest tree accepted; deeper trees fail instead of exhausting the stack
    pub max_depth: usize,
    /// Record generated → source position mappings
    pub include_mappings: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_mappings: false,
        }
    }
}

/// Unparse result
#[derive(Debug, Clone, Serialize)]
pub struct UnparseResult {
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<Mapping>,
    pub metadata: TreeMetadata,
}

/// Analyze-then-emit pipeline over one registry.
///
/// The analysis pass rejects trees the registry cannot render, or that are
/// too deep, before a single byte is emitted.
pub struct Pipeline<'r> {
    registry: &'r Registry,
    options: Options,
}

impl Pipeline<'static> {
    /// Pipeline over the built-in registry with default options
    pub fn standard() -> Self {
        Self::new(Registry::standard(), Options::default())
    }
}

impl<'r> Pipeline<'r> {
    pub fn new(registry: &'r Registry, options: Options) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn compile(&self, root: &Node) -> Result<UnparseResult, EmitError> {
        let metadata = analyze::standard_passes()
            .with_registry(self.registry)
            .analyze(root)
            .clone();
        debug!(
            nodes = metadata.node_count,
            depth = metadata.max_depth,
            verbatim = metadata.verbatim_nodes,
            "analyzed tree"
        );

        self.preflight(root, &metadata)?;

        let mut output = if self.options.include_mappings {
            Output::with_mappings()
        } else {
            Output::new()
        };
        EmitContext::new(self.registry, &mut output)
            .with_max_depth(self.options.max_depth)
            .dispatch(root)?;

        let (code, mappings) = output.finish();
        debug!(bytes = code.len(), mappings = mappings.len(), "emitted tree");

        Ok(UnparseResult {
            code,
            mappings,
            metadata,
        })
    }

    pub fn compile_document(&self, document: &Document) -> Result<UnparseResult, EmitError> {
        self.compile(&document.root)
    }

    fn preflight(&self, root: &Node, metadata: &TreeMetadata) -> Result<(), EmitError> {
        let limit = self.options.max_depth;
        if metadata.max_depth > limit {
            let span =
                analyze::find_first(root, Some(self.registry), |_, depth| depth > limit).flatten();
            return Err(EmitError::DepthLimitExceeded { limit, span });
        }

        if let Some(&kind) = metadata
            .kinds_used
            .iter()
            .find(|kind| !self.registry.contains(**kind))
        {
            let span = analyze::find_first(root, Some(self.registry), |node, _| node.kind == kind)
                .flatten();
            return Err(EmitError::UnknownKind { kind, span });
        }

        Ok(())
    }
}
