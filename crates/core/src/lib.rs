//! X12 grammar core library.
//!
//! Builds an immutable grammar tree for one transaction set, addresses its
//! nodes by slash-delimited paths, maps incoming segments onto grammar nodes,
//! and validates segments, composites and elements against the grammar's
//! rules. The main entry points are [`GrammarTree::from_def`] for building,
//! [`GrammarTree::get_node_by_path`] for addressing, and [`Node::is_valid`]
//! for validation.

#![warn(missing_docs)]

/// Error type for caller mistakes and malformed definitions.
pub mod error;
/// Slash-delimited node addresses.
pub mod path;
/// Input records handed to the matcher and validator.
pub mod records;
/// The grammar-source collaborator.
pub mod source;
/// Primitive data type syntax checks.
pub mod syntax;
/// The grammar node tree and segment matching.
pub mod tree;
/// Validation of records against grammar nodes.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use error::GrammarError;
pub use path::{Path, PathSegment};
pub use records::{Composite, Delimiters, Element, Field, Segment};
pub use source::GrammarSource;
pub use tree::{GrammarTree, Node, NodeKind};
pub use validate::Input;

// Diagnostics (re-exported from the diagnostics crate)
pub use x12_grammar_diagnostics::{Diagnostic, ErrorSink, NullSink, codes};

// Definition tables
pub use x12_grammar_tables::{
    Charset, DataType, ExternalCodes, GrammarConfig, GrammarDef, Repeat, TABLE_FORMAT_VERSION,
    Usage,
};
