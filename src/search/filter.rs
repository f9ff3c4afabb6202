//! Typed filters.
//!
//! A [`Filter`] matches a document when any field in scope (see
//! [`VariantScope`]) satisfies its payload. Negation flips the per-document
//! verdict, so a filter and its negation always partition a document set.
//!
//! Range filters treat both bounds as inclusive. Range facets use a
//! different, exclusive lower bound; see [`crate::search::facet::FacetRange`].

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::document::value::IndexValue;
use crate::error::{QuiverError, Result};
use crate::search::matcher::VariantScope;

/// An optionally bounded, inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Debug> FilterRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        FilterRange { min, max }
    }

    /// `min <= value <= max`, a missing bound being unbounded.
    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().is_none_or(|min| value >= min)
            && self.max.as_ref().is_none_or(|max| value <= max)
    }

    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (&self.min, &self.max)
            && min > max
        {
            return Err(QuiverError::invalid_argument(format!(
                "range minimum {min:?} is greater than maximum {max:?}"
            )));
        }
        Ok(())
    }
}

/// The typed payload of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    /// Any value is a case-insensitive substring of any text.
    Text { values: Vec<String> },
    /// Any value equals a keyword.
    Keyword { values: Vec<String> },
    IntegerExact { values: Vec<i64> },
    IntegerRange { ranges: Vec<FilterRange<i64>> },
    DecimalExact { values: Vec<f64> },
    DecimalRange { ranges: Vec<FilterRange<f64>> },
    TimestampExact { values: Vec<DateTime<Utc>> },
    TimestampRange { ranges: Vec<FilterRange<DateTime<Utc>>> },
}

impl FilterKind {
    /// Every kind tag accepted on the wire.
    pub const KINDS: &'static [&'static str] = &[
        "text",
        "keyword",
        "integer_exact",
        "integer_range",
        "decimal_exact",
        "decimal_range",
        "timestamp_exact",
        "timestamp_range",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Text { .. } => "text",
            FilterKind::Keyword { .. } => "keyword",
            FilterKind::IntegerExact { .. } => "integer_exact",
            FilterKind::IntegerRange { .. } => "integer_range",
            FilterKind::DecimalExact { .. } => "decimal_exact",
            FilterKind::DecimalRange { .. } => "decimal_range",
            FilterKind::TimestampExact { .. } => "timestamp_exact",
            FilterKind::TimestampRange { .. } => "timestamp_range",
        }
    }

    /// Test one field value against the payload.
    pub fn matches_value(&self, value: &IndexValue) -> bool {
        match self {
            FilterKind::Text { values } => values.iter().any(|needle| {
                let needle = needle.to_lowercase();
                value.texts_contain_lowercase(&needle)
            }),
            FilterKind::Keyword { values } => values.iter().any(|v| value.keywords.contains(v)),
            FilterKind::IntegerExact { values } => values.iter().any(|v| value.integers.contains(v)),
            FilterKind::IntegerRange { ranges } => any_in_ranges(&value.integers, ranges),
            FilterKind::DecimalExact { values } => values.iter().any(|v| value.decimals.contains(v)),
            FilterKind::DecimalRange { ranges } => any_in_ranges(&value.decimals, ranges),
            FilterKind::TimestampExact { values } => {
                values.iter().any(|v| value.timestamps.contains(v))
            }
            FilterKind::TimestampRange { ranges } => any_in_ranges(&value.timestamps, ranges),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FilterKind::IntegerRange { ranges } => ranges.iter().try_for_each(FilterRange::validate),
            FilterKind::DecimalRange { ranges } => ranges.iter().try_for_each(FilterRange::validate),
            FilterKind::TimestampRange { ranges } => {
                ranges.iter().try_for_each(FilterRange::validate)
            }
            FilterKind::Text { .. }
            | FilterKind::Keyword { .. }
            | FilterKind::IntegerExact { .. }
            | FilterKind::DecimalExact { .. }
            | FilterKind::TimestampExact { .. } => Ok(()),
        }
    }
}

fn any_in_ranges<T: PartialOrd + Debug>(values: &[T], ranges: &[FilterRange<T>]) -> bool {
    values
        .iter()
        .any(|value| ranges.iter().any(|range| range.contains(value)))
}

/// A filter on one field.
///
/// # Examples
///
/// ```
/// use quiver::search::filter::Filter;
///
/// let filter = Filter::keyword("tags", ["rust", "search"]).negated();
/// assert!(filter.negate);
/// assert_eq!(filter.field_name, "tags");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field_name: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl Filter {
    pub fn new<S: Into<String>>(field_name: S, kind: FilterKind) -> Self {
        Filter {
            field_name: field_name.into(),
            negate: false,
            kind,
        }
    }

    pub fn text<S, I, V>(field_name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field_name, FilterKind::Text { values })
    }

    pub fn keyword<S, I, V>(field_name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field_name, FilterKind::Keyword { values })
    }

    pub fn integer_exact<S: Into<String>, I: IntoIterator<Item = i64>>(field_name: S, values: I) -> Self {
        let values = values.into_iter().collect();
        Self::new(field_name, FilterKind::IntegerExact { values })
    }

    pub fn integer_range<S: Into<String>>(field_name: S, min: Option<i64>, max: Option<i64>) -> Self {
        let ranges = vec![FilterRange::new(min, max)];
        Self::new(field_name, FilterKind::IntegerRange { ranges })
    }

    pub fn decimal_exact<S: Into<String>, I: IntoIterator<Item = f64>>(field_name: S, values: I) -> Self {
        let values = values.into_iter().collect();
        Self::new(field_name, FilterKind::DecimalExact { values })
    }

    pub fn decimal_range<S: Into<String>>(field_name: S, min: Option<f64>, max: Option<f64>) -> Self {
        let ranges = vec![FilterRange::new(min, max)];
        Self::new(field_name, FilterKind::DecimalRange { ranges })
    }

    pub fn timestamp_exact<S, I>(field_name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let values = values.into_iter().collect();
        Self::new(field_name, FilterKind::TimestampExact { values })
    }

    pub fn timestamp_range<S: Into<String>>(
        field_name: S,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        let ranges = vec![FilterRange::new(min, max)];
        Self::new(field_name, FilterKind::TimestampRange { ranges })
    }

    /// Flip the filter.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Reject payloads that could never match, such as inverted ranges.
    pub fn validate(&self) -> Result<()> {
        self.kind.validate()
    }

    /// Evaluate the filter against one document.
    pub fn matches(&self, document: &Document, scope: &VariantScope<'_>) -> bool {
        let matched = scope
            .fields(document, Some(self.field_name.as_str()))
            .into_iter()
            .any(|field| self.kind.matches_value(&field.value));
        matched != self.negate
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::config::EngineConfig;
    use crate::document::document::ObjectKind;
    use crate::document::field::{Field, Variation};

    fn document(fields: Vec<Field>) -> Document {
        Document::new(
            Uuid::new_v4(),
            ObjectKind::Content,
            vec![Variation::invariant()],
            fields,
            None,
        )
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let value = IndexValue::texts_r1(["The Quick Brown Fox"]);
        assert!(Filter::text("title", ["quick"]).kind.matches_value(&value));
        assert!(Filter::text("title", ["missing", "BROWN"]).kind.matches_value(&value));
        assert!(!Filter::text("title", ["slow"]).kind.matches_value(&value));
    }

    #[test]
    fn test_keyword_filter_is_exact() {
        let value = IndexValue::keywords(["news", "sports"]);
        assert!(Filter::keyword("tags", ["sports"]).kind.matches_value(&value));
        assert!(!Filter::keyword("tags", ["sport"]).kind.matches_value(&value));
    }

    #[test]
    fn test_range_filter_bounds_are_inclusive() {
        let filter = Filter::integer_range("count", Some(10), Some(50));
        assert!(filter.kind.matches_value(&IndexValue::integers([10])));
        assert!(filter.kind.matches_value(&IndexValue::integers([50])));
        assert!(!filter.kind.matches_value(&IndexValue::integers([9])));
        assert!(!filter.kind.matches_value(&IndexValue::integers([51])));
    }

    #[test]
    fn test_range_filter_open_bounds() {
        let at_least = Filter::decimal_range("price", Some(1.5), None);
        assert!(at_least.kind.matches_value(&IndexValue::decimals([1_000_000.0])));
        assert!(!at_least.kind.matches_value(&IndexValue::decimals([1.49])));

        let at_most = Filter::decimal_range("price", None, Some(1.5));
        assert!(at_most.kind.matches_value(&IndexValue::decimals([-3.0])));
    }

    #[test]
    fn test_multiple_ranges_are_or() {
        let filter = Filter::new(
            "count",
            FilterKind::IntegerRange {
                ranges: vec![
                    FilterRange::new(Some(0), Some(5)),
                    FilterRange::new(Some(100), None),
                ],
            },
        );
        assert!(filter.kind.matches_value(&IndexValue::integers([3])));
        assert!(filter.kind.matches_value(&IndexValue::integers([150])));
        assert!(!filter.kind.matches_value(&IndexValue::integers([50])));
    }

    #[test]
    fn test_timestamp_filters() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let value = IndexValue::timestamps([jan]);

        assert!(Filter::timestamp_exact("published", [jan]).kind.matches_value(&value));
        assert!(!Filter::timestamp_exact("published", [feb]).kind.matches_value(&value));
        assert!(Filter::timestamp_range("published", None, Some(jan)).kind.matches_value(&value));
        assert!(!Filter::timestamp_range("published", Some(feb), None).kind.matches_value(&value));
    }

    #[test]
    fn test_negation_flips_document_verdict() {
        let config = EngineConfig::default();
        let scope = VariantScope::new(&config, None, None);
        let doc = document(vec![Field::new("tags", IndexValue::keywords(["a", "b"]))]);

        let filter = Filter::keyword("tags", ["a"]);
        assert!(filter.matches(&doc, &scope));
        assert!(!filter.clone().negated().matches(&doc, &scope));

        // A document without the field never matches, so its negation does.
        let bare = document(vec![]);
        assert!(!filter.matches(&bare, &scope));
        assert!(filter.negated().matches(&bare, &scope));
    }

    #[test]
    fn test_filter_uses_variant_fallback() {
        let config = EngineConfig::default();
        let doc = document(vec![
            Field::new("count", IndexValue::integers([1])),
            Field::new("count", IndexValue::integers([2])).with_segment("s1"),
        ]);

        let segment_scope = VariantScope::new(&config, None, Some("s1"));
        assert!(Filter::integer_exact("count", [2]).matches(&doc, &segment_scope));
        assert!(!Filter::integer_exact("count", [1]).matches(&doc, &segment_scope));

        let other_scope = VariantScope::new(&config, None, Some("s2"));
        assert!(Filter::integer_exact("count", [1]).matches(&doc, &other_scope));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let filter = Filter::integer_range("count", Some(10), Some(1));
        assert!(matches!(filter.validate(), Err(QuiverError::InvalidArgument(_))));
        assert!(Filter::integer_range("count", Some(1), Some(10)).validate().is_ok());
    }

    #[test]
    fn test_filter_json_shape() {
        let filter: Filter = serde_json::from_str(
            r#"{"field_name":"count","negate":true,"kind":"integer_range","ranges":[{"min":1}]}"#,
        )
        .unwrap();

        assert!(filter.negate);
        assert_eq!(
            filter.kind,
            FilterKind::IntegerRange {
                ranges: vec![FilterRange::new(Some(1), None)],
            }
        );
    }
}
