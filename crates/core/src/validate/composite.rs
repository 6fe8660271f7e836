use super::{Input, fail};
use crate::records::Composite;
use crate::tree::Node;
use x12_grammar_diagnostics::{ErrorSink, codes};
use x12_grammar_tables::Usage;

pub(super) fn validate(node: &Node<'_>, input: Input<'_>, sink: &mut dyn ErrorSink) -> bool {
    let composite = match input {
        Input::Absent => None,
        Input::Composite(c) => Some(c),
        Input::Element(_) | Input::Segment(_) => return node.mismatch(input, sink),
    };
    check(node, composite, sink)
}

/// Validate a composite that is known to be the right shape (or absent).
pub(super) fn check(
    node: &Node<'_>,
    composite: Option<&Composite>,
    sink: &mut dyn ErrorSink,
) -> bool {
    let Some(composite) = composite.filter(|c| !c.is_empty()) else {
        if node.usage().is_required() {
            return fail(
                sink,
                codes::REQUIRED_COMPOSITE_MISSING,
                node,
                format!("Mandatory composite {} is missing", node.label()),
            );
        }
        return true;
    };

    if node.usage() == Usage::NotUsed {
        return fail(
            sink,
            codes::SEGMENT_NOT_USED,
            node,
            format!(
                "Composite {} is marked as Not Used but is present",
                node.label()
            ),
        );
    }

    if composite.len() > node.child_count() {
        return fail(
            sink,
            codes::SEGMENT_TOO_LONG,
            node,
            format!(
                "Composite {} has {} sub-elements, only {} are defined",
                node.label(),
                composite.len(),
                node.child_count()
            ),
        );
    }

    let mut valid = true;
    for (i, child) in node.children().enumerate() {
        valid &= child.is_valid(composite.get(i), sink);
    }
    valid
}
