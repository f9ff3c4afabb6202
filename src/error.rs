//! Error types for the Quiver library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`QuiverError`] enum.
//!
//! # Examples
//!
//! ```
//! use quiver::error::{QuiverError, Result};
//!
//! fn lookup(alias: &str) -> Result<()> {
//!     Err(QuiverError::index_not_found(alias))
//! }
//!
//! match lookup("content") {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for Quiver operations.
#[derive(Error, Debug)]
pub enum QuiverError {
    /// A search targeted an index alias that has never been registered.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// A filter, facet or sorter kind the engine does not know how to evaluate.
    #[error("Unsupported {family} kind: {kind}")]
    UnsupportedKind {
        /// Which family the kind belongs to (`filter`, `facet` or `sorter`).
        family: String,
        /// The offending kind tag.
        kind: String,
    },

    /// A sort was requested without any sorter.
    #[error("At least one sorter is required")]
    EmptySorters,

    /// Invalid configuration or request values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with QuiverError.
pub type Result<T> = std::result::Result<T, QuiverError>;

impl QuiverError {
    /// Create a new index-not-found error.
    pub fn index_not_found<S: Into<String>>(alias: S) -> Self {
        QuiverError::IndexNotFound(alias.into())
    }

    /// Create a new unsupported-kind error.
    pub fn unsupported_kind<F: Into<String>, K: Into<String>>(family: F, kind: K) -> Self {
        QuiverError::UnsupportedKind {
            family: family.into(),
            kind: kind.into(),
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        QuiverError::InvalidArgument(msg.into())
    }
}
