//! Document storage.
//!
//! The [`traits::Indexer`] trait is the write boundary of the engine;
//! [`memory::MemoryDocumentStore`] is the in-memory implementation the
//! searcher reads from.

pub mod memory;
pub mod traits;

pub use memory::{IndexedDocument, MemoryDocumentStore, MemoryIndex};
pub use traits::{HealthStatus, IndexMetadata, Indexer};
