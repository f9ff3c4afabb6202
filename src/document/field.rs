//! Fields and variations.
//!
//! A document may carry several [`Field`]s with the same name that differ
//! only by culture and/or segment; that is how variant values are stored.
//! A [`Variation`] instead declares that the document as a whole exists in
//! a given culture/segment combination.

use serde::{Deserialize, Serialize};

use crate::document::value::IndexValue;

/// One occurrence of a named value, optionally pinned to a culture and segment.
///
/// # Examples
///
/// ```
/// use quiver::document::field::Field;
/// use quiver::document::value::IndexValue;
///
/// let field = Field::new("body", IndexValue::texts(["Hello"]))
///     .with_culture("en-US")
///     .with_segment("members");
///
/// assert_eq!(field.culture.as_deref(), Some("en-US"));
/// assert_eq!(field.segment.as_deref(), Some("members"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_name: String,
    pub value: IndexValue,
    /// `None` means the value applies to every culture.
    #[serde(default)]
    pub culture: Option<String>,
    /// `None` means the value is not pinned to a segment.
    #[serde(default)]
    pub segment: Option<String>,
}

impl Field {
    /// Create an invariant, segment-less field.
    pub fn new<S: Into<String>>(field_name: S, value: IndexValue) -> Self {
        Field {
            field_name: field_name.into(),
            value,
            culture: None,
            segment: None,
        }
    }

    /// Pin the field to a culture.
    pub fn with_culture<S: Into<String>>(mut self, culture: S) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Pin the field to a segment.
    pub fn with_segment<S: Into<String>>(mut self, segment: S) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Check whether two fields occupy the same (name, culture, segment) slot.
    pub fn same_slot(&self, other: &Field) -> bool {
        self.field_name == other.field_name
            && self.culture == other.culture
            && self.segment == other.segment
    }
}

/// A culture/segment combination a document is published in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variation {
    /// `None` matches every requested culture.
    #[serde(default)]
    pub culture: Option<String>,
    /// `None` matches every requested segment.
    #[serde(default)]
    pub segment: Option<String>,
}

impl Variation {
    /// Create a variation.
    pub fn new(culture: Option<String>, segment: Option<String>) -> Self {
        Variation { culture, segment }
    }

    /// A variation visible to every culture and segment.
    pub fn invariant() -> Self {
        Self::default()
    }

    /// A variation for one culture, any segment.
    pub fn culture<S: Into<String>>(culture: S) -> Self {
        Variation {
            culture: Some(culture.into()),
            segment: None,
        }
    }

    /// Restrict this variation to a segment.
    pub fn with_segment<S: Into<String>>(mut self, segment: S) -> Self {
        self.segment = Some(segment.into());
        self
    }
}
