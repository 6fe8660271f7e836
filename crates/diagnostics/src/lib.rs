//! Diagnostics for X12 grammar validation.
//!
//! Provides the [`ErrorSink`] collaborator contract used by the validation
//! engine, the [`Diagnostic`] record produced by the collecting sink, and a
//! [`NullSink`] for silent validation. Taxonomy codes are defined in the
//! [`codes`] module.

#![warn(missing_docs)]

/// Error taxonomy identifiers.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// ── Sinks ────────────────────────────────────────────────────────────────

/// Receives validation failures.
///
/// The validation engine calls [`report`](ErrorSink::report) once for every
/// failure it detects and never buffers or inspects what the sink does with
/// it. Sinks are passed explicitly into every validation call, so one grammar
/// can be shared across threads while each pass keeps its own sink.
pub trait ErrorSink {
    /// Record a failure with taxonomy `code` and a human-readable `message`.
    fn report(&mut self, code: &'static str, message: &str);

    /// Record a failure raised at the grammar node addressed by `path`.
    ///
    /// The engine always reports through this method. The default drops the
    /// path and forwards to [`report`](ErrorSink::report).
    fn report_at(&mut self, code: &'static str, path: &str, message: &str) {
        let _ = path;
        self.report(code, message);
    }
}

/// A sink that discards everything. Use it for pure yes/no validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn report(&mut self, _code: &'static str, _message: &str) {}
}

impl ErrorSink for Vec<Diagnostic> {
    fn report(&mut self, code: &'static str, message: &str) {
        self.push(Diagnostic::new(code, message));
    }

    fn report_at(&mut self, code: &'static str, path: &str, message: &str) {
        let context = BTreeMap::from([("path".to_string(), path.to_string())]);
        self.push(Diagnostic::new(code, message).with_context(context));
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn report(&mut self, code: &'static str, message: &str) {
        (**self).report(code, message);
    }

    fn report_at(&mut self, code: &'static str, path: &str, message: &str) {
        (**self).report_at(code, path, message);
    }
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// A recorded validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Taxonomy code (e.g., `"7"`).
    pub id: Cow<'static, str>,
    /// What failed, naming the element and value.
    pub message: String,
    /// Extra key/value detail (node path, offending value). Omitted from JSON
    /// when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given code and message.
    pub fn new(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Attach context such as `"path"` or `"value"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Long-form description of this diagnostic's code.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.id, self.message)
    }
}

/// Returns the human-readable explanation for a taxonomy code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        "1" => Some("A mandatory data element is missing or empty."),
        "2" => Some("A mandatory composite is missing or all of its sub-elements are empty."),
        "3" => Some("The segment or composite carries more fields than the grammar declares."),
        "4" => Some("The data element is shorter than its minimum length."),
        "5" => Some(
            "The data element is longer than its maximum length, or a segment or composite \
             marked not used is present.",
        ),
        "6" => Some(
            "The value contains characters or syntax invalid for its data type, or the \
             record has the wrong shape for its grammar node.",
        ),
        "7" => Some("The value is not one of the codes allowed for this data element."),
        "8" => Some("The value is not a valid date or date range."),
        "9" => Some("The value is not a valid time."),
        "10" => Some("A data element marked not used is present."),
        _ => None,
    }
}
