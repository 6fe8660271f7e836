//! Already-tokenized input records handed to the validator.
//!
//! The lexer that isolates segments in a document stream lives elsewhere;
//! these types only hold one segment's worth of values.

use serde::{Deserialize, Serialize};

/// Delimiters of the interchange a segment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Segment terminator (`~`).
    pub segment: char,
    /// Element separator (`*`).
    pub element: char,
    /// Sub-element (composite) separator (`:`).
    pub sub_element: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            segment: '~',
            element: '*',
            sub_element: ':',
        }
    }
}

/// A simple element value.
///
/// Absence (`None`) is distinct from an empty string, though requirement
/// checks treat the two alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    value: Option<String>,
}

impl Element {
    /// An element holding `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// An absent element.
    pub fn absent() -> Self {
        Self { value: None }
    }

    /// The value, or `None` when absent.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the element is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().is_none_or(str::is_empty)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::new(value)
    }
}

/// A composite value: ordered sub-element values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composite {
    elements: Vec<Element>,
}

impl Composite {
    /// A composite of the given sub-elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Split `raw` on the sub-element separator.
    pub fn parse(raw: &str, sub_element: char) -> Self {
        Self {
            elements: raw.split(sub_element).map(Element::from).collect(),
        }
    }

    /// The sub-elements, in order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The sub-element at 0-based `idx`.
    pub fn get(&self, idx: usize) -> Option<&Element> {
        self.elements.get(idx)
    }

    /// Number of sub-element positions present.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether every sub-element is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.elements.iter().all(Element::is_empty)
    }
}

impl From<Element> for Composite {
    fn from(element: Element) -> Self {
        Self {
            elements: vec![element],
        }
    }
}

/// One field of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// Simple element.
    Element(Element),
    /// Composite.
    Composite(Composite),
}

impl Field {
    /// The field value; the first sub-element for composites.
    pub fn first_value(&self) -> Option<&str> {
        match self {
            Field::Element(e) => e.value(),
            Field::Composite(c) => c.get(0).and_then(Element::value),
        }
    }

    /// Whether the field carries no data.
    pub fn is_empty(&self) -> bool {
        match self {
            Field::Element(e) => e.is_empty(),
            Field::Composite(c) => c.is_empty(),
        }
    }
}

/// One segment: identifier plus fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    id: String,
    fields: Vec<Field>,
    #[serde(default)]
    delimiters: Delimiters,
}

impl Segment {
    /// A segment with default delimiters.
    pub fn new(id: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            id: id.into(),
            fields,
            delimiters: Delimiters::default(),
        }
    }

    /// Split one isolated segment, with or without its terminator.
    ///
    /// A field containing the sub-element separator becomes a [`Composite`].
    ///
    /// ```
    /// use x12_grammar_core::records::{Delimiters, Segment};
    ///
    /// let seg = Segment::parse("CLM*657657*AA**5::1~", &Delimiters::default());
    /// assert_eq!(seg.id(), "CLM");
    /// assert_eq!(seg.value(2), Some("AA"));
    /// assert_eq!(seg.value(4), Some("5"));
    /// ```
    pub fn parse(raw: &str, delimiters: &Delimiters) -> Self {
        let raw = raw.strip_suffix(delimiters.segment).unwrap_or(raw);
        let mut parts = raw.split(delimiters.element);
        let id = parts.next().unwrap_or_default().to_string();
        let fields = parts
            .map(|part| {
                if part.contains(delimiters.sub_element) {
                    Field::Composite(Composite::parse(part, delimiters.sub_element))
                } else {
                    Field::Element(Element::new(part))
                }
            })
            .collect();
        Self {
            id,
            fields,
            delimiters: *delimiters,
        }
    }

    /// Segment identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All fields, in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field at 1-based `position`.
    pub fn field(&self, position: usize) -> Option<&Field> {
        position.checked_sub(1).and_then(|i| self.fields.get(i))
    }

    /// The value at 1-based `position` (first sub-element for composites).
    pub fn value(&self, position: usize) -> Option<&str> {
        self.field(position).and_then(Field::first_value)
    }

    /// Delimiters the segment was read with.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Render back to delimited text, terminator included.
    pub fn format(&self) -> String {
        let d = &self.delimiters;
        let mut out = self.id.clone();
        for field in &self.fields {
            out.push(d.element);
            match field {
                Field::Element(e) => out.push_str(e.value().unwrap_or_default()),
                Field::Composite(c) => {
                    for (i, e) in c.elements().iter().enumerate() {
                        if i > 0 {
                            out.push(d.sub_element);
                        }
                        out.push_str(e.value().unwrap_or_default());
                    }
                }
            }
        }
        out.push(d.segment);
        out
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}
