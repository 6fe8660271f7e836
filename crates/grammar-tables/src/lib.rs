//! X12 grammar definition tables.
//!
//! Defines the data structures a grammar source hands to the core: the
//! transaction set definition, its loops, segments, composites and elements,
//! and the shared vocabulary (usage, data types, character sets). These
//! tables are deserialized from JSON or built in code, then compiled into an
//! immutable grammar tree by the core crate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current format version for the grammar definition JSON schema.
pub const TABLE_FORMAT_VERSION: &str = "0.1.0";

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// Requirement level of a grammar node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Usage {
    /// Must be present.
    #[serde(rename = "R", alias = "required")]
    Required,
    /// May be present.
    #[serde(rename = "S", alias = "situational")]
    Situational,
    /// Must not be present.
    #[serde(rename = "N", alias = "not_used")]
    NotUsed,
}

impl Usage {
    /// `true` for [`Usage::Required`].
    pub fn is_required(self) -> bool {
        self == Usage::Required
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Usage::Required => write!(f, "R"),
            Usage::Situational => write!(f, "S"),
            Usage::NotUsed => write!(f, "N"),
        }
    }
}

/// Primitive X12 data element type.
///
/// Serialized as its X12 spelling (`"N2"`, `"R"`, `"ID"`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    /// Numeric with an implied decimal point; the payload is the implied
    /// number of decimal places when declared (`N0`..`N9`).
    Numeric(Option<u8>),
    /// Decimal number with an explicit, optional decimal point.
    Decimal,
    /// Identifier drawn from a code list.
    Identifier,
    /// Free alphanumeric string.
    AlphaNumeric,
    /// Date, `CCYYMMDD` or `YYMMDD`.
    Date,
    /// Time, `HHMM[SS[d..]]`.
    Time,
    /// Binary or otherwise unrestricted data.
    Binary,
}

impl DataType {
    /// `true` for types whose length excludes sign and decimal point.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Numeric(_) | DataType::Decimal)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Numeric(None) => write!(f, "N"),
            DataType::Numeric(Some(places)) => write!(f, "N{places}"),
            DataType::Decimal => write!(f, "R"),
            DataType::Identifier => write!(f, "ID"),
            DataType::AlphaNumeric => write!(f, "AN"),
            DataType::Date => write!(f, "DT"),
            DataType::Time => write!(f, "TM"),
            DataType::Binary => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(DataType::Numeric(None)),
            "R" => Ok(DataType::Decimal),
            "ID" => Ok(DataType::Identifier),
            "AN" => Ok(DataType::AlphaNumeric),
            "DT" => Ok(DataType::Date),
            "TM" => Ok(DataType::Time),
            "B" => Ok(DataType::Binary),
            _ => {
                let places = s
                    .strip_prefix('N')
                    .filter(|rest| rest.len() == 1)
                    .and_then(|rest| rest.parse::<u8>().ok());
                match places {
                    Some(p) => Ok(DataType::Numeric(Some(p))),
                    None => Err(format!("unknown data type {s:?}")),
                }
            }
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

/// Character set permitted in `ID` and `AN` values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// Uppercase letters, digits, basic punctuation and whitespace.
    #[default]
    Basic,
    /// The basic set plus lowercase letters and extended punctuation.
    Extended,
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Grammar-wide settings stored with the tree at build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrammarConfig {
    /// Character set used for `ID`/`AN` syntax checks.
    #[serde(default)]
    pub charset: Charset,
}

// ─── External code sets ──────────────────────────────────────────────────────

/// Registry of code sets that grammars reference by name instead of
/// enumerating inline (e.g. `"states"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ExternalCodes {
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl ExternalCodes {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or extend) the code set `name`.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sets
            .entry(name.into())
            .or_default()
            .extend(codes.into_iter().map(Into::into));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<I, S>(mut self, name: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, codes);
        self
    }

    /// Membership of `code` in set `name`, or `None` when no such set is registered.
    pub fn contains(&self, name: &str, code: &str) -> Option<bool> {
        self.sets.get(name).map(|set| set.contains(code))
    }

    /// Whether a set named `name` is registered.
    pub fn has_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }
}

// ─── Definitions ─────────────────────────────────────────────────────────────

/// Minimum/maximum repeat count of a loop or segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repeat {
    /// Minimum occurrences.
    #[serde(default)]
    pub min: u32,
    /// Maximum occurrences; `None` is unbounded (`>1`).
    #[serde(default = "default_max_repeat")]
    pub max: Option<u32>,
}

fn default_max_repeat() -> Option<u32> {
    Some(1)
}

impl Default for Repeat {
    fn default() -> Self {
        Self {
            min: 0,
            max: default_max_repeat(),
        }
    }
}

impl Repeat {
    /// Whether `count` occurrences fall within the bounds.
    pub fn allows(&self, count: u32) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

/// Qualifier that tells apart repeated segments sharing an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QualifierDef {
    /// 1-based element position holding the qualifying value (`1` for `DTP01`).
    pub position: usize,
    /// The value that selects this segment variant.
    pub value: String,
}

/// A whole transaction set grammar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrammarDef {
    /// Transaction set identifier (e.g., `"837"`).
    pub transaction_set: String,
    /// Interchange control version number (e.g., `"00401"`).
    pub icvn: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Table format version for compatibility checks.
    #[serde(default = "default_format_version")]
    pub format_version: String,
    /// Grammar-wide configuration.
    #[serde(default)]
    pub config: GrammarConfig,
    /// Externally defined code sets referenced by elements.
    #[serde(default)]
    pub external_codes: ExternalCodes,
    /// Top-level loops and segments, in declaration order.
    pub children: Vec<LoopChildDef>,
}

fn default_format_version() -> String {
    TABLE_FORMAT_VERSION.to_string()
}

impl GrammarDef {
    /// Parse a definition from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// A child of a loop: either a nested loop or a segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LoopChildDef {
    /// Nested loop.
    Loop(LoopDef),
    /// Segment.
    Segment(SegmentDef),
}

/// A repeatable group of segments and loops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoopDef {
    /// Loop identifier (e.g., `"2300"`).
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Requirement level.
    pub usage: Usage,
    /// Repeat bounds.
    #[serde(default)]
    pub repeat: Repeat,
    /// Segments and loops, in declaration order.
    pub children: Vec<LoopChildDef>,
}

/// A segment and its fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDef {
    /// Segment identifier (e.g., `"DTP"`).
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Requirement level.
    pub usage: Usage,
    /// Repeat bounds.
    #[serde(default)]
    pub repeat: Repeat,
    /// Qualifier that distinguishes this segment from same-identifier siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<QualifierDef>,
    /// Elements and composites, in field order.
    pub fields: Vec<FieldDef>,
}

/// A field of a segment: a simple element or a composite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldDef {
    /// Simple data element.
    Element(ElementDef),
    /// Composite data structure.
    Composite(CompositeDef),
}

/// A composite data structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositeDef {
    /// Reference designator (e.g., `"CLM05"`).
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Requirement level.
    pub usage: Usage,
    /// Sub-elements, in order.
    pub elements: Vec<ElementDef>,
}

/// A simple data element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementDef {
    /// Reference designator (e.g., `"CLM01"`, `"CLM05-01"`).
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Requirement level.
    pub usage: Usage,
    /// Data element dictionary number (e.g., `"1250"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ele: Option<String>,
    /// Primitive data type; `None` places no syntax constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Minimum length.
    #[serde(default)]
    pub min_len: usize,
    /// Maximum length.
    pub max_len: usize,
    /// Enumerated codes and their descriptions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub valid_codes: BTreeMap<String, String>,
    /// Name of an externally defined code set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_codes: Option<String>,
}
