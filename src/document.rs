//! Document model.
//!
//! # Core Components
//!
//! - [`value::IndexValue`] - Typed, multi-valued slots for one field occurrence
//! - [`field::Field`] - A named value optionally pinned to a culture and segment
//! - [`field::Variation`] - A culture/segment combination a document exists in
//! - [`document::Document`] - Key, object kind, variations, fields and protection
//!
//! # Examples
//!
//! ```
//! use quiver::document::document::{Document, ObjectKind};
//! use quiver::document::field::{Field, Variation};
//! use quiver::document::value::IndexValue;
//! use uuid::Uuid;
//!
//! let doc = Document::builder(Uuid::new_v4(), ObjectKind::Content)
//!     .variation(Variation::culture("en-US"))
//!     .field(Field::new("title", IndexValue::texts_r1(["Rust Programming Guide"])))
//!     .field(Field::new("year", IndexValue::integers([2024])))
//!     .build();
//!
//! assert_eq!(doc.fields().len(), 2);
//! ```

pub mod document;
pub mod field;
pub mod value;
