//! Faceted search: grouped and ranged counts over a candidate set.
//!
//! Facets and filters interact through two splits:
//!
//! - a filter is a *facet filter* when a requested facet shares its field
//!   name, otherwise it is a *regular filter*;
//! - a facet is *active* when some facet filter targets it, otherwise it is
//!   *passive*.
//!
//! Active facets are counted after regular filters but before facet
//! filters, so selecting a value never shrinks that value's own bucket.
//! Passive facets are counted over the fully filtered set.
//!
//! Range facet buckets use an exclusive lower bound and an inclusive upper
//! bound (`min < v <= max`), unlike range filters which include both ends.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::document::Document;
use crate::document::value::IndexValue;
use crate::error::{QuiverError, Result};
use crate::search::filter::Filter;
use crate::search::matcher::VariantScope;

/// A named bucket of a range facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRange<T> {
    pub key: String,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Debug> FacetRange<T> {
    pub fn new<S: Into<String>>(key: S, min: Option<T>, max: Option<T>) -> Self {
        FacetRange {
            key: key.into(),
            min,
            max,
        }
    }

    /// `min < value <= max`, a missing bound being unbounded.
    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().is_none_or(|min| value > min)
            && self.max.as_ref().is_none_or(|max| value <= max)
    }

    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (&self.min, &self.max)
            && min > max
        {
            return Err(QuiverError::invalid_argument(format!(
                "facet range '{}' minimum {min:?} is greater than maximum {max:?}",
                self.key
            )));
        }
        Ok(())
    }
}

/// What a facet counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetKind {
    /// Distinct strings across the four text slots.
    Text,
    Keyword,
    IntegerExact,
    IntegerRange { ranges: Vec<FacetRange<i64>> },
    DecimalExact,
    DecimalRange { ranges: Vec<FacetRange<f64>> },
    TimestampExact,
    TimestampRange { ranges: Vec<FacetRange<DateTime<Utc>>> },
}

impl FacetKind {
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
}

/// A facet request on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub field_name: String,
    #[serde(flatten)]
    pub kind: FacetKind,
}

impl Facet {
    pub fn new<S: Into<String>>(field_name: S, kind: FacetKind) -> Self {
        Facet {
            field_name: field_name.into(),
            kind,
        }
    }

    pub fn text<S: Into<String>>(field_name: S) -> Self {
        Self::new(field_name, FacetKind::Text)
    }

    pub fn keyword<S: Into<String>>(field_name: S) -> Self {
        Self::new(field_name, FacetKind::Keyword)
    }

    pub fn integer_exact<S: Into<String>>(field_name: S) -> Self {
        Self::new(field_name, FacetKind::IntegerExact)
    }

    pub fn integer_range<S: Into<String>>(field_name: S, ranges: Vec<FacetRange<i64>>) -> Self {
        Self::new(field_name, FacetKind::IntegerRange { ranges })
    }

    pub fn decimal_exact<S: Into<String>>(field_name: S) -> Self {
        Self::new(field_name, FacetKind::DecimalExact)
    }

    pub fn decimal_range<S: Into<String>>(field_name: S, ranges: Vec<FacetRange<f64>>) -> Self {
        Self::new(field_name, FacetKind::DecimalRange { ranges })
    }

    pub fn timestamp_exact<S: Into<String>>(field_name: S) -> Self {
        Self::new(field_name, FacetKind::TimestampExact)
    }

    pub fn timestamp_range<S: Into<String>>(
        field_name: S,
        ranges: Vec<FacetRange<DateTime<Utc>>>,
    ) -> Self {
        Self::new(field_name, FacetKind::TimestampRange { ranges })
    }

    /// Reject inverted bucket bounds.
    pub fn validate(&self) -> Result<()> {
        match &self.kind {
            FacetKind::IntegerRange { ranges } => ranges.iter().try_for_each(FacetRange::validate),
            FacetKind::DecimalRange { ranges } => ranges.iter().try_for_each(FacetRange::validate),
            FacetKind::TimestampRange { ranges } => {
                ranges.iter().try_for_each(FacetRange::validate)
            }
            FacetKind::Text
            | FacetKind::Keyword
            | FacetKind::IntegerExact
            | FacetKind::DecimalExact
            | FacetKind::TimestampExact => Ok(()),
        }
    }

    /// Count the facet over `documents`.
    pub fn compute(&self, documents: &[&Document], scope: &VariantScope<'_>) -> FacetResult {
        let name = self.field_name.as_str();
        let values: Vec<FacetValue> = match &self.kind {
            FacetKind::Text => {
                exact_counts(documents, scope, name, text_values, Clone::clone, Ord::cmp)
                    .into_iter()
                    .map(|(key, count)| FacetValue::Text { key, count })
                    .collect()
            }
            FacetKind::Keyword => {
                exact_counts(documents, scope, name, keyword_values, Clone::clone, Ord::cmp)
                    .into_iter()
                    .map(|(key, count)| FacetValue::Keyword { key, count })
                    .collect()
            }
            FacetKind::IntegerExact => {
                exact_counts(documents, scope, name, integer_values, |v| *v, Ord::cmp)
                    .into_iter()
                    .map(|(key, count)| FacetValue::IntegerExact { key, count })
                    .collect()
            }
            FacetKind::DecimalExact => {
                exact_counts(documents, scope, name, decimal_values, decimal_key, f64::total_cmp)
                    .into_iter()
                    .map(|(key, count)| FacetValue::DecimalExact { key, count })
                    .collect()
            }
            FacetKind::TimestampExact => {
                exact_counts(documents, scope, name, timestamp_values, |v| *v, Ord::cmp)
                    .into_iter()
                    .map(|(key, count)| FacetValue::TimestampExact { key, count })
                    .collect()
            }
            FacetKind::IntegerRange { ranges } => {
                range_counts(documents, scope, name, integer_values, ranges)
                    .into_iter()
                    .map(|(range, count)| FacetValue::IntegerRange {
                        key: range.key.clone(),
                        min: range.min,
                        max: range.max,
                        count,
                    })
                    .collect()
            }
            FacetKind::DecimalRange { ranges } => {
                range_counts(documents, scope, name, decimal_values, ranges)
                    .into_iter()
                    .map(|(range, count)| FacetValue::DecimalRange {
                        key: range.key.clone(),
                        min: range.min,
                        max: range.max,
                        count,
                    })
                    .collect()
            }
            FacetKind::TimestampRange { ranges } => {
                range_counts(documents, scope, name, timestamp_values, ranges)
                    .into_iter()
                    .map(|(range, count)| FacetValue::TimestampRange {
                        key: range.key.clone(),
                        min: range.min,
                        max: range.max,
                        count,
                    })
                    .collect()
            }
        };

        trace!(
            target: "quiver::facet",
            field = %self.field_name,
            documents = documents.len(),
            buckets = values.len(),
            "Facet computed"
        );

        FacetResult {
            field_name: self.field_name.clone(),
            values,
        }
    }
}

fn text_values(value: &IndexValue) -> Vec<&String> {
    [&value.texts_r1, &value.texts_r2, &value.texts_r3, &value.texts]
        .into_iter()
        .flatten()
        .collect()
}

fn keyword_values(value: &IndexValue) -> Vec<&String> {
    value.keywords.iter().collect()
}

fn integer_values(value: &IndexValue) -> Vec<&i64> {
    value.integers.iter().collect()
}

fn decimal_values(value: &IndexValue) -> Vec<&f64> {
    value.decimals.iter().collect()
}

fn timestamp_values(value: &IndexValue) -> Vec<&DateTime<Utc>> {
    value.timestamps.iter().collect()
}

/// Hashable identity of a decimal; `-0.0` and `0.0` count as one value.
fn decimal_key(value: &f64) -> u64 {
    if *value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Count documents per distinct slot value.
///
/// A document contributes at most once to each value, however many in-scope
/// fields or repeated slot entries carry it. Results are ordered by count
/// descending, then by value ascending.
fn exact_counts<T, K>(
    documents: &[&Document],
    scope: &VariantScope<'_>,
    field_name: &str,
    values_of: fn(&IndexValue) -> Vec<&T>,
    key_of: fn(&T) -> K,
    order: fn(&T, &T) -> Ordering,
) -> Vec<(T, u64)>
where
    T: Clone,
    K: Hash + Eq + Clone,
{
    let mut counts: AHashMap<K, (T, u64)> = AHashMap::new();

    for document in documents {
        let mut seen: AHashSet<K> = AHashSet::new();
        for field in scope.fields(document, Some(field_name)) {
            for value in values_of(&field.value) {
                let key = key_of(value);
                if seen.insert(key.clone()) {
                    counts.entry(key).or_insert_with(|| (value.clone(), 0)).1 += 1;
                }
            }
        }
    }

    let mut values: Vec<(T, u64)> = counts.into_values().collect();
    values.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| order(a, b)));
    values
}

/// Count documents per declared bucket, keeping declaration order.
fn range_counts<'r, T>(
    documents: &[&Document],
    scope: &VariantScope<'_>,
    field_name: &str,
    values_of: fn(&IndexValue) -> Vec<&T>,
    ranges: &'r [FacetRange<T>],
) -> Vec<(&'r FacetRange<T>, u64)>
where
    T: PartialOrd + Debug,
{
    let mut counts = vec![0u64; ranges.len()];

    for document in documents {
        let fields = scope.fields(document, Some(field_name));
        for (range, count) in ranges.iter().zip(counts.iter_mut()) {
            let hit = fields
                .iter()
                .any(|field| values_of(&field.value).into_iter().any(|value| range.contains(value)));
            if hit {
                *count += 1;
            }
        }
    }

    ranges.iter().zip(counts).collect()
}

/// Counts for one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    pub field_name: String,
    pub values: Vec<FacetValue>,
}

impl FacetResult {
    /// Count reported for an exact keyword value, if present.
    pub fn keyword_count(&self, keyword: &str) -> Option<u64> {
        self.values.iter().find_map(|value| match value {
            FacetValue::Keyword { key, count } if key == keyword => Some(*count),
            _ => None,
        })
    }

    /// Count reported for a named range bucket, if present.
    pub fn range_count(&self, bucket: &str) -> Option<u64> {
        self.values.iter().find_map(|value| match value {
            FacetValue::IntegerRange { key, count, .. }
            | FacetValue::DecimalRange { key, count, .. }
            | FacetValue::TimestampRange { key, count, .. }
                if key == bucket =>
            {
                Some(*count)
            }
            _ => None,
        })
    }
}

/// One bucket of a facet result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetValue {
    Text {
        key: String,
        count: u64,
    },
    Keyword {
        key: String,
        count: u64,
    },
    IntegerExact {
        key: i64,
        count: u64,
    },
    DecimalExact {
        key: f64,
        count: u64,
    },
    TimestampExact {
        key: DateTime<Utc>,
        count: u64,
    },
    IntegerRange {
        key: String,
        min: Option<i64>,
        max: Option<i64>,
        count: u64,
    },
    DecimalRange {
        key: String,
        min: Option<f64>,
        max: Option<f64>,
        count: u64,
    },
    TimestampRange {
        key: String,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
        count: u64,
    },
}

impl FacetValue {
    pub fn count(&self) -> u64 {
        match self {
            FacetValue::Text { count, .. }
            | FacetValue::Keyword { count, .. }
            | FacetValue::IntegerExact { count, .. }
            | FacetValue::DecimalExact { count, .. }
            | FacetValue::TimestampExact { count, .. }
            | FacetValue::IntegerRange { count, .. }
            | FacetValue::DecimalRange { count, .. }
            | FacetValue::TimestampRange { count, .. } => *count,
        }
    }
}

/// Split filters into (regular, facet) filters.
pub fn split_filters<'f>(filters: &'f [Filter], facets: &[Facet]) -> (Vec<&'f Filter>, Vec<&'f Filter>) {
    filters.iter().partition(|filter| {
        !facets
            .iter()
            .any(|facet| facet.field_name == filter.field_name)
    })
}

/// Split facet indexes into (active, passive) given the facet filters.
///
/// Indexes rather than references are returned so results can be put back
/// into request order.
pub fn split_facets(facets: &[Facet], facet_filters: &[&Filter]) -> (Vec<usize>, Vec<usize>) {
    (0..facets.len()).partition(|&index| {
        facet_filters
            .iter()
            .any(|filter| filter.field_name == facets[index].field_name)
    })
}
