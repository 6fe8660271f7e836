use super::{composite, element, fail};
use crate::records::{Composite, Field, Segment};
use crate::syntax::DateTimeFormat;
use crate::tree::{Node, Rules};
use x12_grammar_diagnostics::{ErrorSink, codes};
use x12_grammar_tables::Usage;

/// Data element number of a date/time period format qualifier.
const FORMAT_QUALIFIER_ELE: &str = "1250";
/// Data element number of the date/time period it qualifies.
const PERIOD_ELE: &str = "1251";

pub(super) fn validate(node: &Node<'_>, segment: &Segment, sink: &mut dyn ErrorSink) -> bool {
    if segment.id() != node.id() {
        return fail(
            sink,
            codes::INVALID_SYNTAX,
            node,
            format!(
                "Segment {} was matched against {}",
                segment.id(),
                node.label()
            ),
        );
    }

    if node.usage() == Usage::NotUsed {
        return fail(
            sink,
            codes::SEGMENT_NOT_USED,
            node,
            format!("Segment {} is marked as Not Used", node.label()),
        );
    }

    let declared = node.child_count();
    if segment.fields().len() > declared {
        return fail(
            sink,
            codes::SEGMENT_TOO_LONG,
            node,
            format!(
                "Segment {} has {} elements, only {declared} are defined",
                node.label(),
                segment.fields().len()
            ),
        );
    }

    let mut valid = true;
    let mut pending_format: Option<&str> = None;
    for (i, child) in node.children().enumerate() {
        let field = segment.field(i + 1);
        valid &= match child.rules() {
            Rules::Element(rules) => {
                let refine = if rules.data_ele.as_deref() == Some(PERIOD_ELE) {
                    pending_format
                        .take()
                        .and_then(DateTimeFormat::from_qualifier)
                } else {
                    None
                };
                if rules.data_ele.as_deref() == Some(FORMAT_QUALIFIER_ELE) {
                    pending_format = field.and_then(Field::first_value);
                }
                element::validate(&child, rules, field.into(), refine, sink)
            }
            Rules::Composite => match field {
                Some(Field::Element(e)) => {
                    let promoted = Composite::from(e.clone());
                    composite::check(&child, Some(&promoted), sink)
                }
                Some(Field::Composite(c)) => composite::check(&child, Some(c), sink),
                None => composite::check(&child, None, sink),
            },
            Rules::Segment { .. } | Rules::Loop { .. } => child.is_valid(field, sink),
        };
    }
    valid
}
