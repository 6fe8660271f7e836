use thiserror::Error;

/// Errors raised for caller mistakes and malformed grammar definitions.
///
/// Problems in the validated document are never reported this way; they go
/// through an [`ErrorSink`](x12_grammar_diagnostics::ErrorSink) instead.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A path string could not be parsed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPathSyntax {
        /// The offending path text.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A child index past the end of a node's children.
    #[error("child index {index} out of range for node with {len} children")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of children the node has.
        len: usize,
    },

    /// A grammar definition that would produce an inconsistent tree.
    #[error("invalid grammar definition at {path}: {reason}")]
    InvalidDefinition {
        /// Path of the offending node.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A grammar source has no definition for the requested transaction set.
    #[error("no grammar for transaction set {0:?}")]
    UnknownTransactionSet(String),

    /// JSON deserialization of a grammar definition failed.
    #[error("invalid grammar JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl GrammarError {
    pub(crate) fn path_syntax(path: &str, reason: impl Into<String>) -> Self {
        GrammarError::InvalidPathSyntax {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn definition(path: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        GrammarError::InvalidDefinition {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
