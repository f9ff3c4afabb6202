//! # Quiver
//!
//! The query and indexing core of a content search layer.
//!
//! ## Features
//!
//! - Schema-flexible documents with typed, multi-valued field slots
//! - Culture and segment variants with per-document segment fallback
//! - Typed filters (text, keyword, integer, decimal, timestamp) with negation
//! - Two-phase faceting that keeps selected facet counts stable
//! - Typed sorting with missing values last
//! - Access scoping for protected documents
//! - Cascading delete through an ancestor id trail

pub mod config;
pub mod document;
pub mod error;
pub mod search;
pub mod store;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::document::document::{Document, DocumentRef, ObjectKind, Protection};
    pub use crate::document::field::{Field, Variation};
    pub use crate::document::value::IndexValue;
    pub use crate::error::{QuiverError, Result};
    pub use crate::search::access::AccessContext;
    pub use crate::search::facet::{Facet, FacetRange, FacetResult, FacetValue};
    pub use crate::search::filter::{Filter, FilterKind, FilterRange};
    pub use crate::search::sorter::{Direction, Sorter};
    pub use crate::search::{SearchEngine, SearchRequest, SearchResult, Searcher};
    pub use crate::store::{HealthStatus, IndexMetadata, Indexer, MemoryDocumentStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
