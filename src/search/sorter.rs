//! Result ordering.
//!
//! A typed sorter reads the first element of the relevant slot of the first
//! in-scope field that has one. Documents without a value always sort after
//! documents with one, whatever the direction; direction only decides the
//! order between two present values. Sorting is stable.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::value::IndexValue;
use crate::error::{QuiverError, Result};
use crate::search::matcher::VariantScope;
use crate::store::memory::IndexedDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// How to order results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sorter {
    /// Relevance. Earlier-inserted documents score higher.
    Score {
        #[serde(default)]
        direction: Direction,
    },
    Keyword {
        field_name: String,
        #[serde(default)]
        direction: Direction,
    },
    Integer {
        field_name: String,
        #[serde(default)]
        direction: Direction,
    },
    Decimal {
        field_name: String,
        #[serde(default)]
        direction: Direction,
    },
    Timestamp {
        field_name: String,
        #[serde(default)]
        direction: Direction,
    },
    /// Case-insensitive, on the highest relevance text tier present.
    Text {
        field_name: String,
        #[serde(default)]
        direction: Direction,
    },
}

impl Default for Sorter {
    fn default() -> Self {
        Sorter::Score {
            direction: Direction::Descending,
        }
    }
}

impl Sorter {
    /// Every kind tag accepted on the wire.
    pub const KINDS: &'static [&'static str] =
        &["score", "keyword", "integer", "decimal", "timestamp", "text"];

    pub fn score(direction: Direction) -> Self {
        Sorter::Score { direction }
    }

    pub fn keyword<S: Into<String>>(field_name: S, direction: Direction) -> Self {
        Sorter::Keyword {
            field_name: field_name.into(),
            direction,
        }
    }

    pub fn integer<S: Into<String>>(field_name: S, direction: Direction) -> Self {
        Sorter::Integer {
            field_name: field_name.into(),
            direction,
        }
    }

    pub fn decimal<S: Into<String>>(field_name: S, direction: Direction) -> Self {
        Sorter::Decimal {
            field_name: field_name.into(),
            direction,
        }
    }

    pub fn timestamp<S: Into<String>>(field_name: S, direction: Direction) -> Self {
        Sorter::Timestamp {
            field_name: field_name.into(),
            direction,
        }
    }

    pub fn text<S: Into<String>>(field_name: S, direction: Direction) -> Self {
        Sorter::Text {
            field_name: field_name.into(),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Sorter::Score { direction }
            | Sorter::Keyword { direction, .. }
            | Sorter::Integer { direction, .. }
            | Sorter::Decimal { direction, .. }
            | Sorter::Timestamp { direction, .. }
            | Sorter::Text { direction, .. } => *direction,
        }
    }

    /// Read this sorter's value for every entry, in entry order.
    fn column(&self, entries: &[&IndexedDocument], scope: &VariantScope<'_>) -> SortColumn {
        match self {
            Sorter::Score { .. } => {
                SortColumn::Score(entries.iter().map(|entry| entry.sequence).collect())
            }
            Sorter::Keyword { field_name, .. } => SortColumn::Keyword(read_column(
                entries,
                scope,
                field_name,
                |v| v.keywords.first().cloned(),
            )),
            Sorter::Text { field_name, .. } => SortColumn::Text(read_column(
                entries,
                scope,
                field_name,
                |v| v.first_text().map(str::to_lowercase),
            )),
            Sorter::Integer { field_name, .. } => SortColumn::Integer(read_column(
                entries,
                scope,
                field_name,
                |v| v.integers.first().copied(),
            )),
            Sorter::Decimal { field_name, .. } => SortColumn::Decimal(read_column(
                entries,
                scope,
                field_name,
                |v| v.decimals.first().copied(),
            )),
            Sorter::Timestamp { field_name, .. } => SortColumn::Timestamp(read_column(
                entries,
                scope,
                field_name,
                |v| v.timestamps.first().copied(),
            )),
        }
    }
}

/// The first value `read` finds in the in-scope fields of each entry.
fn read_column<T>(
    entries: &[&IndexedDocument],
    scope: &VariantScope<'_>,
    field_name: &str,
    read: impl Fn(&IndexValue) -> Option<T>,
) -> Vec<Option<T>> {
    entries
        .iter()
        .map(|entry| {
            scope
                .fields(&entry.document, Some(field_name))
                .into_iter()
                .find_map(|field| read(&field.value))
        })
        .collect()
}

/// One sorter's values for every entry being sorted, indexed by position.
#[derive(Debug)]
enum SortColumn {
    /// Insertion sequence; lower means higher score.
    Score(Vec<u64>),
    Keyword(Vec<Option<String>>),
    Text(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Decimal(Vec<Option<f64>>),
    Timestamp(Vec<Option<DateTime<Utc>>>),
}

impl SortColumn {
    fn compare(&self, left: usize, right: usize, direction: Direction) -> Ordering {
        match self {
            SortColumn::Score(sequences) => apply(sequences[right].cmp(&sequences[left]), direction),
            SortColumn::Keyword(values) | SortColumn::Text(values) => {
                compare_present(&values[left], &values[right], direction, Ord::cmp)
            }
            SortColumn::Integer(values) => {
                compare_present(&values[left], &values[right], direction, Ord::cmp)
            }
            SortColumn::Decimal(values) => {
                compare_present(&values[left], &values[right], direction, f64::total_cmp)
            }
            SortColumn::Timestamp(values) => {
                compare_present(&values[left], &values[right], direction, Ord::cmp)
            }
        }
    }
}

/// Present values first; direction applies only between two present values.
fn compare_present<T>(
    left: &Option<T>,
    right: &Option<T>,
    direction: Direction,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => apply(cmp(left, right), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn apply(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

/// Order `entries` by `sorters`; later sorters break ties left by earlier ones.
///
/// The sort is stable: entries that compare equal under every sorter keep
/// the order they were given in.
pub fn sort_documents(
    entries: &mut Vec<&IndexedDocument>,
    sorters: &[Sorter],
    scope: &VariantScope<'_>,
) -> Result<()> {
    if sorters.is_empty() {
        return Err(QuiverError::EmptySorters);
    }

    let columns: Vec<(SortColumn, Direction)> = sorters
        .iter()
        .map(|sorter| (sorter.column(entries.as_slice(), scope), sorter.direction()))
        .collect();

    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&left, &right| {
        columns
            .iter()
            .map(|(column, direction)| column.compare(left, right, *direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    let sorted: Vec<&IndexedDocument> = order.into_iter().map(|position| entries[position]).collect();
    *entries = sorted;
    Ok(())
}
