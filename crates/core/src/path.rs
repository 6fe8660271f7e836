//! Slash-delimited node addresses.
//!
//! ```text
//! /ISA_LOOP/GS_LOOP/ST_LOOP/DETAIL/2000A/2000B/2300/DTP[434]
//! /ISA_LOOP/GS_LOOP/ST_LOOP/DETAIL/2000A/2000B/2300/CLM/05-01
//! DTP[434]/03
//! ```
//!
//! A leading `/` makes the path absolute (resolved from the grammar root);
//! otherwise it is resolved relative to a starting node. Each step is an
//! identifier with an optional `[qualifier]` selecting one of several
//! same-identifier siblings, or an element position with an optional
//! `-NN` sub-element position inside a composite.

use crate::error::GrammarError;
use serde::{Deserialize, Serialize};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    id: String,
    qualifier: Option<String>,
    sub_index: Option<usize>,
}

impl PathSegment {
    /// A plain identifier step. Numeric identifiers are element positions
    /// and a single digit is stored padded, so `5` and `05` name the same step.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: normalize_id(id.into()),
            qualifier: None,
            sub_index: None,
        }
    }

    /// An element position step, rendered as two digits (`03`).
    pub fn position(pos: usize) -> Self {
        Self::new(format!("{pos:02}"))
    }

    /// Attach a `[qualifier]`.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Attach a 1-based sub-element position (`-NN`).
    pub fn with_sub_index(mut self, sub_index: usize) -> Self {
        self.sub_index = Some(sub_index);
        self
    }

    /// The identifier (or two-digit position) of this step.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The qualifier, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The 1-based sub-element position, if any.
    pub fn sub_index(&self) -> Option<usize> {
        self.sub_index
    }

    /// The 1-based element position when the identifier is numeric.
    pub fn as_position(&self) -> Option<usize> {
        if !self.id.is_empty() && self.id.bytes().all(|b| b.is_ascii_digit()) {
            self.id.parse().ok()
        } else {
            None
        }
    }

    fn parse(full: &str, text: &str) -> Result<Self, GrammarError> {
        if text.is_empty() {
            return Err(GrammarError::path_syntax(full, "empty path segment"));
        }

        let (head, qualifier) = match text.find('[') {
            Some(open) => {
                let Some(inner) = text[open + 1..].strip_suffix(']') else {
                    return Err(GrammarError::path_syntax(
                        full,
                        format!("unterminated qualifier in {text:?}"),
                    ));
                };
                if inner.is_empty() {
                    return Err(GrammarError::path_syntax(
                        full,
                        format!("empty qualifier in {text:?}"),
                    ));
                }
                if inner.contains(['[', ']']) {
                    return Err(GrammarError::path_syntax(
                        full,
                        format!("nested brackets in {text:?}"),
                    ));
                }
                (&text[..open], Some(inner.to_string()))
            }
            None if text.contains(']') => {
                return Err(GrammarError::path_syntax(
                    full,
                    format!("unbalanced ']' in {text:?}"),
                ));
            }
            None => (text, None),
        };

        let (id, sub_index) = match head.split_once('-') {
            Some((id, sub)) => {
                if sub.is_empty() || !sub.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(GrammarError::path_syntax(
                        full,
                        format!("sub-element position must be numeric in {text:?}"),
                    ));
                }
                let sub: usize = sub.parse().map_err(|_| {
                    GrammarError::path_syntax(full, format!("sub-element position too large in {text:?}"))
                })?;
                if sub == 0 {
                    return Err(GrammarError::path_syntax(
                        full,
                        format!("sub-element positions are 1-based in {text:?}"),
                    ));
                }
                (id, Some(sub))
            }
            None => (head, None),
        };

        if id.is_empty() {
            return Err(GrammarError::path_syntax(
                full,
                format!("missing identifier in {text:?}"),
            ));
        }
        if let Some(bad) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(GrammarError::path_syntax(
                full,
                format!("invalid character {bad:?} in identifier {id:?}"),
            ));
        }
        if qualifier.is_some() && sub_index.is_some() {
            return Err(GrammarError::path_syntax(
                full,
                format!("a step cannot carry both a qualifier and a sub-element position: {text:?}"),
            ));
        }

        Ok(Self {
            id: normalize_id(id.to_string()),
            qualifier,
            sub_index,
        })
    }
}

fn normalize_id(id: String) -> String {
    match id.as_bytes() {
        [digit] if digit.is_ascii_digit() => format!("0{id}"),
        _ => id,
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(q) = &self.qualifier {
            write!(f, "[{q}]")?;
        }
        if let Some(sub) = self.sub_index {
            write!(f, "-{sub:02}")?;
        }
        Ok(())
    }
}

/// A parsed node address.
///
/// Equality and hashing are structural, so two paths are equal exactly when
/// their canonical string forms are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    absolute: bool,
    segments: Vec<PathSegment>,
}

impl Path {
    /// The absolute root path `/`.
    pub fn root() -> Self {
        Self {
            absolute: true,
            segments: Vec::new(),
        }
    }

    /// Parse path text.
    ///
    /// Fails with [`GrammarError::InvalidPathSyntax`] on empty segments,
    /// malformed brackets or sub-positions, and invalid identifier characters.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        if text.is_empty() {
            return Err(GrammarError::path_syntax(text, "empty path"));
        }
        let (absolute, rest) = match text.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if absolute && rest.is_empty() {
            return Ok(Self::root());
        }
        let segments = rest
            .split('/')
            .map(|seg| PathSegment::parse(text, seg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { absolute, segments })
    }

    /// Whether the path starts at the grammar root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Whether this is the absolute root path.
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// The steps of this path, in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The final step, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            absolute: self.absolute,
            segments,
        }
    }

    /// A new path whose final step carries the 1-based `sub_index`.
    ///
    /// Used for sub-elements of a composite: `.../CLM/05` becomes `.../CLM/05-01`.
    pub fn with_sub_index(&self, sub_index: usize) -> Self {
        let mut out = self.clone();
        if let Some(last) = out.segments.last_mut() {
            last.sub_index = Some(sub_index);
        }
        out
    }

    /// The path without its final step; `None` for an empty path.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            absolute: self.absolute,
            segments: rest.to_vec(),
        })
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 || self.absolute {
                write!(f, "/")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Path {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = GrammarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl From<Path> for String {
    fn from(value: Path) -> Self {
        value.to_string()
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        Path::parse(other).is_ok_and(|p| p == *self)
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}
