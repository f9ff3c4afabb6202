//! Search evaluation.
//!
//! - [`matcher`] - Culture/segment field resolution with segment fallback
//! - [`filter`] - Typed filters with negation
//! - [`facet`] - Exact and ranged facet counts, active/passive split
//! - [`sorter`] - Score and typed field ordering
//! - [`access`] - Visibility of protected documents
//! - [`request`] - Request and result types
//! - [`engine`] - The orchestrator tying the phases together

pub mod access;
pub mod engine;
pub mod facet;
pub mod filter;
pub mod matcher;
pub mod request;
pub mod sorter;

pub use engine::{SearchEngine, Searcher};
pub use request::{SearchRequest, SearchResult};
