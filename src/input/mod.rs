pub mod positions;
mod tree_builder;

use std::sync::Arc;

use crate::ast::Node;
use crate::error::LoadError;
use tree_builder::{RawDocument, TreeBuilder};

/// A tree together with the source text its spans point into
#[derive(Debug, Clone)]
pub struct Document {
    pub source: Arc<str>,
    pub root: Node,
}

/// Loader trait - reads a serialized tree into a [`Document`]
pub trait Loader {
    fn load(&self, text: &str) -> Result<Document, LoadError>;
}

/// Loads JSON tree documents.
///
/// ```json
/// { "source": "x = ::Foo",
///   "root": { "type": "lvasgn", "span": [0, 9],
///             "children": ["x", { "type": "const", "children": [{ "type": "cbase" }, "Foo"] }] } }
/// ```
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for JsonLoader {
    fn load(&self, text: &str) -> Result<Document, LoadError> {
        let raw: RawDocument = serde_json::from_str(text)?;

        let source: Arc<str> = Arc::from(raw.source);
        let builder = TreeBuilder::new(source.clone());
        let root = builder.build(raw.root, "root")?;

        Ok(Document { source, root })
    }
}
