//! The grammar node tree.
//!
//! A [`GrammarTree`] owns every node in a flat arena; nodes refer to their
//! parent and children by index. The tree is built once from a
//! [`GrammarDef`] and is immutable afterwards, so one tree can be shared
//! across threads by any number of concurrent validation passes.

mod build;
mod matching;
mod node;

pub use node::{Node, NodeKind};

use crate::error::GrammarError;
use crate::path::Path;
use std::collections::BTreeMap;
use x12_grammar_tables::{
    DataType, ExternalCodes, GrammarConfig, GrammarDef, QualifierDef, Repeat, Usage,
};

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

pub(crate) struct NodeData {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) usage: Usage,
    pub(crate) position: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) path: Path,
    pub(crate) rules: Rules,
}

/// Per-kind rules carried by a node.
pub(crate) enum Rules {
    Loop {
        repeat: Repeat,
        /// The segment node that opens this loop.
        entry: Option<NodeId>,
    },
    Segment {
        repeat: Repeat,
        qualifier: Option<QualifierDef>,
    },
    Composite,
    Element(ElementRules),
}

pub(crate) struct ElementRules {
    pub(crate) data_ele: Option<String>,
    pub(crate) data_type: Option<DataType>,
    pub(crate) min_len: usize,
    pub(crate) max_len: usize,
    pub(crate) valid_codes: BTreeMap<String, String>,
    pub(crate) external_codes: Option<String>,
}

/// An immutable transaction set grammar.
///
/// The root is a loop node named after the transaction set whose path is `/`.
pub struct GrammarTree {
    nodes: Vec<NodeData>,
    transaction_set: String,
    icvn: String,
    config: GrammarConfig,
    external_codes: ExternalCodes,
}

impl GrammarTree {
    /// Build a tree from a definition.
    ///
    /// Fails with [`GrammarError::InvalidDefinition`] when the definition
    /// would make paths ambiguous or declares impossible bounds.
    pub fn from_def(def: &GrammarDef) -> Result<Self, GrammarError> {
        let nodes = build::build_nodes(def)?;
        tracing::debug!(
            transaction_set = %def.transaction_set,
            icvn = %def.icvn,
            nodes = nodes.len(),
            "built grammar tree"
        );
        Ok(Self {
            nodes,
            transaction_set: def.transaction_set.clone(),
            icvn: def.icvn.clone(),
            config: def.config.clone(),
            external_codes: def.external_codes.clone(),
        })
    }

    /// Parse a JSON definition and build its tree.
    pub fn from_json_str(s: &str) -> Result<Self, GrammarError> {
        let def = GrammarDef::from_json_str(s)?;
        Self::from_def(&def)
    }

    /// Transaction set identifier (e.g., `"837"`).
    pub fn transaction_set(&self) -> &str {
        &self.transaction_set
    }

    /// Interchange control version number (e.g., `"00401"`).
    pub fn icvn(&self) -> &str {
        &self.icvn
    }

    /// Grammar-wide configuration.
    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Externally defined code sets.
    pub fn external_codes(&self) -> &ExternalCodes {
        &self.external_codes
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node.
    pub fn root(&self) -> Node<'_> {
        Node::new(self, NodeId(0))
    }

    /// Resolve `path`; relative paths resolve from the root.
    ///
    /// Returns `Ok(None)` when any step is absent and
    /// [`GrammarError::InvalidPathSyntax`] when the text does not parse.
    pub fn get_node_by_path(&self, path: &str) -> Result<Option<Node<'_>>, GrammarError> {
        self.root().get_node_by_path(path)
    }

    /// Resolve an already-parsed path.
    pub fn resolve(&self, path: &Path) -> Option<Node<'_>> {
        self.root().resolve(path)
    }

    /// Every node in depth-first declaration order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(|i| Node::new(self, NodeId(i)))
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl std::fmt::Debug for GrammarTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarTree")
            .field("transaction_set", &self.transaction_set)
            .field("icvn", &self.icvn)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
