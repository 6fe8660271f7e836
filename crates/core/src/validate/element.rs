use super::{Input, fail};
use crate::syntax::{DateTimeFormat, is_valid_syntax};
use crate::tree::{ElementRules, Node};
use x12_grammar_diagnostics::{ErrorSink, codes};
use x12_grammar_tables::{DataType, Usage};

/// Validate one element value.
///
/// `refine` carries the date/time format selected by a preceding format
/// qualifier in the same segment, if any.
pub(super) fn validate(
    node: &Node<'_>,
    rules: &ElementRules,
    input: Input<'_>,
    refine: Option<DateTimeFormat>,
    sink: &mut dyn ErrorSink,
) -> bool {
    let value = match input {
        Input::Absent => None,
        Input::Element(e) => e.value(),
        Input::Composite(_) | Input::Segment(_) => return node.mismatch(input, sink),
    };

    let Some(value) = value.filter(|v| !v.is_empty()) else {
        if node.usage().is_required() {
            return fail(
                sink,
                codes::REQUIRED_ELEMENT_MISSING,
                node,
                format!("Mandatory data element {} is missing", node.label()),
            );
        }
        return true;
    };

    if node.usage() == Usage::NotUsed {
        return fail(
            sink,
            codes::ELEMENT_NOT_USED,
            node,
            format!(
                "Data element {} is marked as Not Used but has value {value:?}",
                node.label()
            ),
        );
    }

    // padding may fill a fixed-width minimum but never counts against the maximum
    let padded_len = significant_len(value, rules.data_type);
    let value = unpadded(value, rules.data_type);
    let len = significant_len(value, rules.data_type);
    if padded_len < rules.min_len {
        return fail(
            sink,
            codes::ELEMENT_TOO_SHORT,
            node,
            format!(
                "Data element {} is too short: {value:?} has length {padded_len}, minimum is {}",
                node.label(),
                rules.min_len
            ),
        );
    }
    if len > rules.max_len {
        return fail(
            sink,
            codes::ELEMENT_TOO_LONG,
            node,
            format!(
                "Data element {} is too long: {value:?} has length {len}, maximum is {}",
                node.label(),
                rules.max_len
            ),
        );
    }

    if rules.data_type == Some(DataType::AlphaNumeric) && value.ends_with(' ') {
        return fail(
            sink,
            codes::INVALID_SYNTAX,
            node,
            format!(
                "Data element {} has trailing spaces: {value:?}",
                node.label()
            ),
        );
    }

    let charset = node.tree().config().charset;
    if !is_valid_syntax(value, rules.data_type, charset) {
        let code = match rules.data_type {
            Some(DataType::Date) => codes::INVALID_DATE,
            Some(DataType::Time) => codes::INVALID_TIME,
            _ => codes::INVALID_SYNTAX,
        };
        let expected = rules
            .data_type
            .map_or_else(String::new, |t| format!(" for type {t}"));
        return fail(
            sink,
            code,
            node,
            format!(
                "Data element {} has invalid value {value:?}{expected}",
                node.label()
            ),
        );
    }

    if let Some(format) = refine
        && !format.is_valid(value)
    {
        let code = if format.is_time() {
            codes::INVALID_TIME
        } else {
            codes::INVALID_DATE
        };
        return fail(
            sink,
            code,
            node,
            format!(
                "Data element {} value {value:?} does not match date/time format {format:?}",
                node.label()
            ),
        );
    }

    if !code_allowed(node, rules, value) {
        return fail(
            sink,
            codes::INVALID_CODE,
            node,
            format!(
                "Data element {} has invalid code value {value:?}",
                node.label()
            ),
        );
    }

    true
}

/// Identifier values drop trailing padding before the maximum-length, syntax
/// and code checks. A value of nothing but spaces is kept as is.
fn unpadded(value: &str, data_type: Option<DataType>) -> &str {
    match value.trim_end_matches(' ') {
        trimmed if data_type == Some(DataType::Identifier) && !trimmed.is_empty() => trimmed,
        _ => value,
    }
}

/// Length that counts against the bounds; signs and decimal points are free
/// for numeric types.
fn significant_len(value: &str, data_type: Option<DataType>) -> usize {
    match data_type {
        Some(t) if t.is_numeric() => value.chars().filter(|c| !matches!(c, '-' | '.')).count(),
        _ => value.chars().count(),
    }
}

fn code_allowed(node: &Node<'_>, rules: &ElementRules, value: &str) -> bool {
    if rules.valid_codes.contains_key(value) {
        return true;
    }
    match rules.external_codes.as_deref() {
        Some(name) => node
            .tree()
            .external_codes()
            .contains(name, value)
            .unwrap_or(true),
        None => rules.valid_codes.is_empty(),
    }
}
