//! Document structure.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::field::{Field, Variation};

/// What kind of object a document was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Content,
    Media,
    Member,
    Element,
}

/// Access restrictions on a document.
///
/// Only principals whose own id or one of whose group ids appears in
/// `access_keys` may see a protected document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    pub access_keys: HashSet<Uuid>,
}

impl Protection {
    /// Create a protection descriptor from a set of access keys.
    pub fn new<I: IntoIterator<Item = Uuid>>(access_keys: I) -> Self {
        Protection {
            access_keys: access_keys.into_iter().collect(),
        }
    }
}

/// The reference returned for each search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub key: Uuid,
    pub object_kind: ObjectKind,
}

/// A document represents a single indexed item.
///
/// Every upsert supplies the complete document; there is no partial update.
/// At most one field exists per exact (name, culture, segment) triple; adding
/// a field for an occupied triple replaces the earlier one.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Document {
    key: Uuid,
    object_kind: ObjectKind,
    #[serde(default)]
    variations: Vec<Variation>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    protection: Option<Protection>,
}

impl Document {
    /// Create a document. Later fields win over earlier fields for the same triple.
    pub fn new(
        key: Uuid,
        object_kind: ObjectKind,
        variations: Vec<Variation>,
        fields: Vec<Field>,
        protection: Option<Protection>,
    ) -> Self {
        let mut document = Document {
            key,
            object_kind,
            variations,
            fields: Vec::with_capacity(fields.len()),
            protection,
        };
        for field in fields {
            document.add_field(field);
        }
        document
    }

    /// Create a builder for constructing documents.
    pub fn builder(key: Uuid, object_kind: ObjectKind) -> DocumentBuilder {
        DocumentBuilder::new(key, object_kind)
    }

    /// Add a field, replacing any field in the same slot.
    pub fn add_field(&mut self, field: Field) {
        match self.fields.iter_mut().find(|existing| existing.same_slot(&field)) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn key(&self) -> Uuid {
        self.key
    }

    pub fn object_kind(&self) -> ObjectKind {
        self.object_kind
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn protection(&self) -> Option<&Protection> {
        self.protection.as_ref()
    }

    /// All fields carrying the given name, across cultures and segments.
    pub fn find_fields<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |field| field.field_name == name)
    }

    /// Distinct field names, in first-seen order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .map(|field| field.field_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// The reference search results carry for this document.
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef {
            key: self.key,
            object_kind: self.object_kind,
        }
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new(key: Uuid, object_kind: ObjectKind) -> Self {
        DocumentBuilder {
            document: Document::new(key, object_kind, Vec::new(), Vec::new(), None),
        }
    }

    /// Declare a culture/segment combination the document exists in.
    pub fn variation(mut self, variation: Variation) -> Self {
        if !self.document.variations.contains(&variation) {
            self.document.variations.push(variation);
        }
        self
    }

    /// Add a field to the document.
    pub fn field(mut self, field: Field) -> Self {
        self.document.add_field(field);
        self
    }

    /// Restrict the document to the given access keys.
    pub fn protection(mut self, protection: Protection) -> Self {
        self.document.protection = Some(protection);
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        self.document
    }
}
