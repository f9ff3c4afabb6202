//! Indexer abstraction trait and common types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::document::{ObjectKind, Protection};
use crate::document::field::{Field, Variation};

/// Health of an index as reported by [`Indexer::get_metadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The index exists and can be searched.
    Healthy,
    /// No index is registered under the alias.
    Unknown,
}

/// Administrative information about one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub document_count: u64,
    pub health_status: HealthStatus,
}

/// A sink for document changes, keyed by index alias.
///
/// Every operation is total: writing to an unknown alias registers it, and
/// deleting a key that does not exist is a no-op.
pub trait Indexer: Send + Sync + std::fmt::Debug {
    /// Replace the document stored at `key` with a new one.
    fn upsert(
        &self,
        index_alias: &str,
        key: Uuid,
        object_kind: ObjectKind,
        variations: Vec<Variation>,
        fields: Vec<Field>,
        protection: Option<Protection>,
    );

    /// Remove the given documents and all of their descendants.
    ///
    /// Returns how many documents were removed in total.
    fn delete(&self, index_alias: &str, keys: &[Uuid]) -> usize;

    /// Remove every document from an index, registering it if needed.
    fn reset(&self, index_alias: &str);

    /// Document count and health for an index.
    fn get_metadata(&self, index_alias: &str) -> IndexMetadata;
}
