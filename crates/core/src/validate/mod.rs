//! Validation of input records against grammar nodes.
//!
//! [`Node::is_valid`] is the single entry point. It dispatches on the node
//! kind, checks requirement level, length, data type syntax and code sets,
//! and reports every failure to the caller's [`ErrorSink`]. The engine keeps
//! no state between calls; the tree is only read.

mod composite;
mod element;
mod segment;

use crate::records::{Composite, Element, Field, Segment};
use crate::tree::{Node, Rules};
use x12_grammar_diagnostics::{ErrorSink, codes};

/// A record handed to [`Node::is_valid`].
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// Nothing present at this position.
    Absent,
    /// A simple element.
    Element(&'a Element),
    /// A composite.
    Composite(&'a Composite),
    /// A whole segment.
    Segment(&'a Segment),
}

impl<'a> From<&'a Element> for Input<'a> {
    fn from(value: &'a Element) -> Self {
        Input::Element(value)
    }
}

impl<'a> From<&'a Composite> for Input<'a> {
    fn from(value: &'a Composite) -> Self {
        Input::Composite(value)
    }
}

impl<'a> From<&'a Segment> for Input<'a> {
    fn from(value: &'a Segment) -> Self {
        Input::Segment(value)
    }
}

impl<'a> From<&'a Field> for Input<'a> {
    fn from(value: &'a Field) -> Self {
        match value {
            Field::Element(e) => Input::Element(e),
            Field::Composite(c) => Input::Composite(c),
        }
    }
}

impl<'a, T> From<Option<T>> for Input<'a>
where
    T: Into<Input<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Absent, Into::into)
    }
}

impl Input<'_> {
    fn describe(&self) -> &'static str {
        match self {
            Input::Absent => "nothing",
            Input::Element(_) => "an element",
            Input::Composite(_) => "a composite",
            Input::Segment(_) => "a segment",
        }
    }
}

impl Node<'_> {
    /// Validate `input` against this node's rules.
    ///
    /// Returns `false` after reporting each failure to `sink`. A record of the
    /// wrong shape for the node (a composite given to an element node, any
    /// record given to a loop) is an ordinary failure with code `"6"`.
    ///
    /// ```
    /// # use x12_grammar_core::{GrammarTree, records::Element};
    /// # use x12_grammar_diagnostics::{Diagnostic, NullSink};
    /// # let tree = GrammarTree::from_json_str(r#"{"transactionSet":"1","icvn":"1","children":[
    /// #   {"kind":"segment","id":"TST","usage":"R","fields":[
    /// #     {"kind":"element","id":"TST01","usage":"R","dataType":"ID","minLen":2,"maxLen":2,
    /// #      "validCodes":{"11":"Office"}}]}]}"#).unwrap();
    /// let node = tree.get_node_by_path("/TST/01").unwrap().unwrap();
    /// assert!(node.is_valid(&Element::new("11"), &mut NullSink));
    ///
    /// let mut issues: Vec<Diagnostic> = Vec::new();
    /// assert!(!node.is_valid(&Element::new("02"), &mut issues));
    /// assert_eq!(issues[0].id, "7");
    /// ```
    pub fn is_valid<'a>(&self, input: impl Into<Input<'a>>, sink: &mut dyn ErrorSink) -> bool {
        let input = input.into();
        match self.rules() {
            Rules::Element(rules) => element::validate(self, rules, input, None, sink),
            Rules::Composite => composite::validate(self, input, sink),
            Rules::Segment { .. } => match input {
                Input::Segment(seg) => segment::validate(self, seg, sink),
                other => self.mismatch(other, sink),
            },
            Rules::Loop { .. } => self.mismatch(input, sink),
        }
    }

    fn mismatch(&self, input: Input<'_>, sink: &mut dyn ErrorSink) -> bool {
        fail(
            sink,
            codes::INVALID_SYNTAX,
            self,
            format!(
                "{} {} ({}) was given {}",
                self.kind(),
                self.id(),
                self.path(),
                input.describe()
            ),
        )
    }

    /// `"name" (id)` as used in messages.
    fn label(&self) -> String {
        if self.name().is_empty() {
            self.id().to_string()
        } else {
            format!("\"{}\" ({})", self.name(), self.id())
        }
    }
}

/// Report a failure and return `false`.
fn fail(sink: &mut dyn ErrorSink, code: &'static str, node: &Node<'_>, message: String) -> bool {
    let path = node.path().to_string();
    tracing::debug!(code, path = %path, "{message}");
    sink.report_at(code, &path, &message);
    false
}
