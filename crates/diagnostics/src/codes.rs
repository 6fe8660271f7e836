//! Error taxonomy identifiers.
//!
//! These are the stable string codes handed to an [`ErrorSink`](crate::ErrorSink).
//! Two failure kinds share `"5"`.

/// Mandatory data element missing.
pub const REQUIRED_ELEMENT_MISSING: &str = "1";

/// Mandatory composite missing, or every sub-element of it empty.
pub const REQUIRED_COMPOSITE_MISSING: &str = "2";

/// More fields (or sub-elements) than the grammar declares.
pub const SEGMENT_TOO_LONG: &str = "3";

/// Data element shorter than its minimum length.
pub const ELEMENT_TOO_SHORT: &str = "4";

/// Data element longer than its maximum length.
pub const ELEMENT_TOO_LONG: &str = "5";

/// Segment or composite present where the grammar marks it not used.
///
/// Shares its identifier with [`ELEMENT_TOO_LONG`]; the taxonomy reuses `"5"`.
pub const SEGMENT_NOT_USED: &str = "5";

/// Invalid character, syntax, or record shape.
pub const INVALID_SYNTAX: &str = "6";

/// Value not in the element's code set.
pub const INVALID_CODE: &str = "7";

/// Invalid date or date range.
pub const INVALID_DATE: &str = "8";

/// Invalid time.
pub const INVALID_TIME: &str = "9";

/// Data element present where the grammar marks it not used.
pub const ELEMENT_NOT_USED: &str = "10";

/// Every distinct taxonomy identifier, in ascending order.
pub const ALL: [&str; 10] = [
    REQUIRED_ELEMENT_MISSING,
    REQUIRED_COMPOSITE_MISSING,
    SEGMENT_TOO_LONG,
    ELEMENT_TOO_SHORT,
    ELEMENT_TOO_LONG,
    INVALID_SYNTAX,
    INVALID_CODE,
    INVALID_DATE,
    INVALID_TIME,
    ELEMENT_NOT_USED,
];
