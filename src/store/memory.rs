//! In-memory document store.
//!
//! Each index alias owns one [`MemoryIndex`] behind its own reader/writer
//! lock: writers are serialized per index while searches share read access.
//! A second lock guards the alias registry itself.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::document::document::{Document, ObjectKind, Protection};
use crate::document::field::{Field, Variation};
use crate::store::traits::{HealthStatus, IndexMetadata, Indexer};

/// A stored document together with its insertion sequence.
///
/// The sequence grows with every upsert and stands in for relevance when
/// results are ordered by score.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub document: Document,
    pub sequence: u64,
}

/// The documents of a single index.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: HashMap<Uuid, IndexedDocument>,
    next_sequence: u64,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing whatever was stored under its key.
    pub fn upsert(&mut self, document: Document) {
        self.next_sequence += 1;
        let key = document.key();
        self.entries.remove(&key);
        self.entries.insert(
            key,
            IndexedDocument {
                document,
                sequence: self.next_sequence,
            },
        );
    }

    /// Remove `keys` and every document whose ancestor trail names one of them.
    ///
    /// The trail is the keyword slot of any field called `path_ids_field`.
    /// One scan per key is enough because a descendant's trail lists every
    /// ancestor, not just its parent.
    pub fn delete(&mut self, keys: &[Uuid], path_ids_field: &str) -> usize {
        let before = self.entries.len();

        for key in keys {
            self.entries.remove(key);

            let key_str = key.to_string();
            self.entries.retain(|_, entry| {
                !entry
                    .document
                    .find_fields(path_ids_field)
                    .any(|field| field.value.has_keyword_ignore_case(&key_str))
            });
        }

        before - self.entries.len()
    }

    /// Remove every document.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &Uuid) -> Option<&IndexedDocument> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedDocument> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An in-memory implementation of [`Indexer`] holding any number of indexes.
///
/// # Examples
///
/// ```
/// use quiver::document::document::ObjectKind;
/// use quiver::document::field::{Field, Variation};
/// use quiver::document::value::IndexValue;
/// use quiver::store::{HealthStatus, Indexer, MemoryDocumentStore};
/// use uuid::Uuid;
///
/// let store = MemoryDocumentStore::default();
/// store.upsert(
///     "content",
///     Uuid::new_v4(),
///     ObjectKind::Content,
///     vec![Variation::invariant()],
///     vec![Field::new("title", IndexValue::texts_r1(["Home"]))],
///     None,
/// );
///
/// let metadata = store.get_metadata("content");
/// assert_eq!(metadata.document_count, 1);
/// assert_eq!(metadata.health_status, HealthStatus::Healthy);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    indexes: RwLock<HashMap<String, Arc<RwLock<MemoryIndex>>>>,
    config: EngineConfig,
}

impl MemoryDocumentStore {
    /// Create a store with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        MemoryDocumentStore {
            indexes: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to an existing index.
    pub fn index(&self, index_alias: &str) -> Option<Arc<RwLock<MemoryIndex>>> {
        self.indexes.read().get(index_alias).cloned()
    }

    /// Handle to an index, registering an empty one if the alias is new.
    fn index_or_create(&self, index_alias: &str) -> Arc<RwLock<MemoryIndex>> {
        if let Some(index) = self.index(index_alias) {
            return index;
        }
        self.indexes
            .write()
            .entry(index_alias.to_string())
            .or_default()
            .clone()
    }

    /// Insert a prepared document.
    pub fn upsert_document(&self, index_alias: &str, document: Document) {
        debug!(
            target: "quiver::store",
            index = index_alias,
            key = %document.key(),
            fields = document.fields().len(),
            "Upsert"
        );
        self.index_or_create(index_alias).write().upsert(document);
    }

    /// A copy of the document stored at `key`.
    pub fn document(&self, index_alias: &str, key: &Uuid) -> Option<Document> {
        let index = self.index(index_alias)?;
        let guard = index.read();
        guard.get(key).map(|entry| entry.document.clone())
    }

    /// Registered aliases, sorted.
    pub fn index_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.indexes.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn document_count(&self, index_alias: &str) -> usize {
        self.index(index_alias)
            .map(|index| index.read().len())
            .unwrap_or(0)
    }
}

impl Indexer for MemoryDocumentStore {
    fn upsert(
        &self,
        index_alias: &str,
        key: Uuid,
        object_kind: ObjectKind,
        variations: Vec<Variation>,
        fields: Vec<Field>,
        protection: Option<Protection>,
    ) {
        let document = Document::new(key, object_kind, variations, fields, protection);
        self.upsert_document(index_alias, document);
    }

    fn delete(&self, index_alias: &str, keys: &[Uuid]) -> usize {
        let Some(index) = self.index(index_alias) else {
            return 0;
        };

        let removed = index.write().delete(keys, &self.config.path_ids_field);
        debug!(
            target: "quiver::store",
            index = index_alias,
            requested = keys.len(),
            removed,
            "Delete"
        );
        removed
    }

    fn reset(&self, index_alias: &str) {
        debug!(target: "quiver::store", index = index_alias, "Reset");
        self.index_or_create(index_alias).write().clear();
    }

    fn get_metadata(&self, index_alias: &str) -> IndexMetadata {
        match self.index(index_alias) {
            Some(index) => IndexMetadata {
                document_count: index.read().len() as u64,
                health_status: HealthStatus::Healthy,
            },
            None => IndexMetadata {
                document_count: 0,
                health_status: HealthStatus::Unknown,
            },
        }
    }
}
