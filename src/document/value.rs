//! Typed, multi-valued field values.
//!
//! An [`IndexValue`] holds any number of values in each of its typed slots.
//! Slots are independent: a rich-text block may populate `texts` and
//! `keywords` on the same value. Order inside a slot does not matter for
//! matching, but the first element is what sorters read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The typed slots of a single field occurrence.
///
/// # Examples
///
/// ```
/// use quiver::document::value::IndexValue;
///
/// let value = IndexValue::texts_r1(["Getting started"])
///     .with_texts(["Install the package and run it."])
///     .with_keywords(["guide"]);
///
/// assert_eq!(value.all_texts().count(), 2);
/// assert_eq!(value.keywords, vec!["guide".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexValue {
    /// Highest relevance text, e.g. a page title.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts_r1: Vec<String>,
    /// Second tier text, e.g. sub headings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts_r2: Vec<String>,
    /// Third tier text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts_r3: Vec<String>,
    /// Body level text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<String>,
    /// Opaque exact-match tokens (ids, tags, enum labels).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integers: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decimals: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<DateTime<Utc>>,
}

fn owned<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl IndexValue {
    /// Create an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value holding top tier texts.
    pub fn texts_r1<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_texts_r1(values)
    }

    /// Create a value holding body texts.
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_texts(values)
    }

    /// Create a value holding keywords.
    pub fn keywords<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_keywords(values)
    }

    /// Create a value holding integers.
    pub fn integers<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::new().with_integers(values)
    }

    /// Create a value holding decimals.
    pub fn decimals<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self::new().with_decimals(values)
    }

    /// Create a value holding timestamps.
    pub fn timestamps<I: IntoIterator<Item = DateTime<Utc>>>(values: I) -> Self {
        Self::new().with_timestamps(values)
    }

    pub fn with_texts_r1<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts_r1.extend(owned(values));
        self
    }

    pub fn with_texts_r2<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts_r2.extend(owned(values));
        self
    }

    pub fn with_texts_r3<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts_r3.extend(owned(values));
        self
    }

    pub fn with_texts<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts.extend(owned(values));
        self
    }

    pub fn with_keywords<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(owned(values));
        self
    }

    pub fn with_integers<I: IntoIterator<Item = i64>>(mut self, values: I) -> Self {
        self.integers.extend(values);
        self
    }

    pub fn with_decimals<I: IntoIterator<Item = f64>>(mut self, values: I) -> Self {
        self.decimals.extend(values);
        self
    }

    pub fn with_timestamps<I: IntoIterator<Item = DateTime<Utc>>>(mut self, values: I) -> Self {
        self.timestamps.extend(values);
        self
    }

    /// Iterate over every text, highest relevance tier first.
    pub fn all_texts(&self) -> impl Iterator<Item = &str> {
        self.texts_r1
            .iter()
            .chain(&self.texts_r2)
            .chain(&self.texts_r3)
            .chain(&self.texts)
            .map(String::as_str)
    }

    /// First value of the highest relevance text tier that has one.
    pub fn first_text(&self) -> Option<&str> {
        [&self.texts_r1, &self.texts_r2, &self.texts_r3, &self.texts]
            .into_iter()
            .find_map(|slot| slot.first())
            .map(String::as_str)
    }

    /// Check whether any text slot contains `needle` ignoring case.
    ///
    /// `needle` must already be lowercased.
    pub fn texts_contain_lowercase(&self, needle: &str) -> bool {
        self.all_texts()
            .any(|text| text.to_lowercase().contains(needle))
    }

    /// Check whether the keyword slot holds `keyword`, ignoring ASCII case.
    pub fn has_keyword_ignore_case(&self, keyword: &str) -> bool {
        self.keywords
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(keyword))
    }

    /// Check whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.texts_r1.is_empty()
            && self.texts_r2.is_empty()
            && self.texts_r3.is_empty()
            && self.texts.is_empty()
            && self.keywords.is_empty()
            && self.integers.is_empty()
            && self.decimals.is_empty()
            && self.timestamps.is_empty()
    }
}
