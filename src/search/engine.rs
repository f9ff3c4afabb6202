//! The search orchestrator.
//!
//! A search runs these phases over one index, under its read lock:
//!
//! 1. keep documents with a variation in the requested culture/segment;
//! 2. drop documents the access context may not see;
//! 3. apply the free-text query;
//! 4. apply regular filters;
//! 5. count active facets;
//! 6. apply facet filters;
//! 7. count passive facets;
//! 8. sort, then slice the requested page.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::document::Document;
use crate::error::{QuiverError, Result};
use crate::search::access::is_visible;
use crate::search::facet::{FacetResult, split_facets, split_filters};
use crate::search::filter::Filter;
use crate::search::matcher::VariantScope;
use crate::search::request::{SearchRequest, SearchResult};
use crate::search::sorter::{Sorter, sort_documents};
use crate::store::memory::{IndexedDocument, MemoryDocumentStore};

/// The read boundary of the engine.
pub trait Searcher: Send + Sync + std::fmt::Debug {
    /// Run `request` against the index registered as `index_alias`.
    fn search(&self, index_alias: &str, request: &SearchRequest) -> Result<SearchResult>;
}

/// Searches the indexes of a [`MemoryDocumentStore`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use quiver::document::document::{Document, ObjectKind};
/// use quiver::document::field::{Field, Variation};
/// use quiver::document::value::IndexValue;
/// use quiver::search::engine::{SearchEngine, Searcher};
/// use quiver::search::request::SearchRequest;
/// use quiver::store::MemoryDocumentStore;
/// use uuid::Uuid;
///
/// let store = Arc::new(MemoryDocumentStore::default());
/// store.upsert_document(
///     "content",
///     Document::builder(Uuid::new_v4(), ObjectKind::Content)
///         .variation(Variation::invariant())
///         .field(Field::new("title", IndexValue::texts_r1(["Hello world"])))
///         .build(),
/// );
///
/// let engine = SearchEngine::new(store);
/// let result = engine
///     .search("content", &SearchRequest::new().query("hello"))
///     .unwrap();
/// assert_eq!(result.total, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SearchEngine {
    store: Arc<MemoryDocumentStore>,
}

impl SearchEngine {
    pub fn new(store: Arc<MemoryDocumentStore>) -> Self {
        SearchEngine { store }
    }

    pub fn store(&self) -> &Arc<MemoryDocumentStore> {
        &self.store
    }

    fn validate(request: &SearchRequest) -> Result<()> {
        for filter in &request.filters {
            filter.validate()?;
        }
        for facet in &request.facets {
            facet.validate()?;
        }
        Ok(())
    }
}

fn matches_query(document: &Document, scope: &VariantScope<'_>, query: &str) -> bool {
    scope
        .fields(document, None)
        .into_iter()
        .any(|field| field.value.texts_contain_lowercase(query))
}

fn apply_filters<'d>(
    candidates: Vec<&'d IndexedDocument>,
    filters: &[&Filter],
    scope: &VariantScope<'_>,
) -> Vec<&'d IndexedDocument> {
    if filters.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|entry| filters.iter().all(|filter| filter.matches(&entry.document, scope)))
        .collect()
}

fn as_documents<'d>(candidates: &[&'d IndexedDocument]) -> Vec<&'d Document> {
    candidates.iter().map(|entry| &entry.document).collect()
}

impl Searcher for SearchEngine {
    fn search(&self, index_alias: &str, request: &SearchRequest) -> Result<SearchResult> {
        let Some(index) = self.store.index(index_alias) else {
            warn!(target: "quiver::search", index = index_alias, "Search against unknown index");
            return Err(QuiverError::index_not_found(index_alias));
        };
        Self::validate(request)?;

        let config = self.store.config();
        let scope = VariantScope::new(
            config,
            request.culture.as_deref(),
            request.segment.as_deref(),
        );
        let context = request.access_context.as_ref();

        let guard = index.read();

        let mut candidates: Vec<&IndexedDocument> = guard
            .iter()
            .filter(|entry| scope.document_applies(&entry.document))
            .filter(|entry| is_visible(&entry.document, context))
            .collect();
        // Hash order is arbitrary; ties must keep insertion order.
        candidates.sort_unstable_by_key(|entry| entry.sequence);
        debug!(
            target: "quiver::search",
            index = index_alias,
            in_scope = candidates.len(),
            stored = guard.len(),
            "Scoped candidates"
        );

        if let Some(query) = request.effective_query() {
            let query = query.to_lowercase();
            candidates.retain(|entry| matches_query(&entry.document, &scope, &query));
        }

        let (regular_filters, facet_filters) = split_filters(&request.filters, &request.facets);
        let (active, passive) = split_facets(&request.facets, &facet_filters);

        candidates = apply_filters(candidates, &regular_filters, &scope);

        let mut facet_results: Vec<Option<FacetResult>> = vec![None; request.facets.len()];
        if !active.is_empty() {
            let docs = as_documents(&candidates);
            for &position in &active {
                facet_results[position] = Some(request.facets[position].compute(&docs, &scope));
            }
        }

        candidates = apply_filters(candidates, &facet_filters, &scope);

        if !passive.is_empty() {
            let docs = as_documents(&candidates);
            for &position in &passive {
                facet_results[position] = Some(request.facets[position].compute(&docs, &scope));
            }
        }

        let default_sorters = [Sorter::default()];
        let sorters = if request.sorters.is_empty() {
            &default_sorters[..]
        } else {
            &request.sorters[..]
        };
        sort_documents(&mut candidates, sorters, &scope)?;

        let total = candidates.len() as u64;
        let take = config.effective_take(request.take);
        let documents = candidates
            .iter()
            .skip(request.skip)
            .take(take)
            .map(|entry| entry.document.to_ref())
            .collect();

        debug!(
            target: "quiver::search",
            index = index_alias,
            total,
            regular_filters = regular_filters.len(),
            facet_filters = facet_filters.len(),
            active_facets = active.len(),
            passive_facets = passive.len(),
            "Search complete"
        );

        Ok(SearchResult {
            total,
            documents,
            facets: facet_results.into_iter().flatten().collect(),
        })
    }
}
