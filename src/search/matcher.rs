//! Variant field resolution.
//!
//! Given a requested culture and segment, [`VariantScope`] decides which
//! fields of a document apply. The same scope drives free-text matching,
//! filters, facets and sorters so all of them agree on variant semantics.
//!
//! A field is an *exact* match when its name matches, its culture is unset
//! or equals the requested culture, and its segment equals the requested
//! segment (unset equals unset). A field is a *fallback* match when the name
//! and culture conditions hold and the field has no segment. Fallback fields
//! only apply when the same document has no exact match for that field name,
//! so a document never matches through both paths.

use ahash::AHashSet;

use crate::config::EngineConfig;
use crate::document::document::Document;
use crate::document::field::{Field, Variation};

/// The culture/segment a search runs in.
#[derive(Debug, Clone, Copy)]
pub struct VariantScope<'a> {
    culture: Option<&'a str>,
    segment: Option<&'a str>,
    config: &'a EngineConfig,
}

impl<'a> VariantScope<'a> {
    /// Create a scope for the given request variant.
    pub fn new(config: &'a EngineConfig, culture: Option<&'a str>, segment: Option<&'a str>) -> Self {
        VariantScope {
            culture,
            segment,
            config,
        }
    }

    pub fn culture(&self) -> Option<&'a str> {
        self.culture
    }

    pub fn segment(&self) -> Option<&'a str> {
        self.segment
    }

    fn same_variant(&self, left: Option<&str>, right: Option<&str>) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(left), Some(right)) => self.config.variant_eq(left, right),
            _ => false,
        }
    }

    /// Unset culture applies to every requested culture.
    fn culture_applies(&self, culture: Option<&str>) -> bool {
        culture.is_none() || self.same_variant(culture, self.culture)
    }

    fn name_applies(field: &Field, field_name: Option<&str>) -> bool {
        field_name.is_none_or(|name| field.field_name == name)
    }

    /// Check whether `field` is pinned to exactly the requested segment.
    pub fn is_exact(&self, field: &Field, field_name: Option<&str>) -> bool {
        Self::name_applies(field, field_name)
            && self.culture_applies(field.culture.as_deref())
            && self.same_variant(field.segment.as_deref(), self.segment)
    }

    /// Check whether `field` is a segment-less value usable as a fallback.
    pub fn is_fallback(&self, field: &Field, field_name: Option<&str>) -> bool {
        Self::name_applies(field, field_name)
            && self.culture_applies(field.culture.as_deref())
            && field.segment.is_none()
    }

    /// The fields of `document` that apply to this scope.
    ///
    /// With `field_name` set only fields of that name are considered; with
    /// `None` every field is, and the exact-before-fallback rule is applied
    /// per field name.
    pub fn fields<'d>(&self, document: &'d Document, field_name: Option<&str>) -> Vec<&'d Field> {
        let exact_names: AHashSet<&str> = document
            .fields()
            .iter()
            .filter(|field| self.is_exact(field, field_name))
            .map(|field| field.field_name.as_str())
            .collect();

        document
            .fields()
            .iter()
            .filter(|field| {
                self.is_exact(field, field_name)
                    || (self.is_fallback(field, field_name)
                        && !exact_names.contains(field.field_name.as_str()))
            })
            .collect()
    }

    /// Check whether a variation makes the document visible in this scope.
    ///
    /// An unset culture or segment on the variation matches any request.
    pub fn variation_applies(&self, variation: &Variation) -> bool {
        let culture = variation.culture.as_deref();
        let segment = variation.segment.as_deref();
        (culture.is_none() || self.same_variant(culture, self.culture))
            && (segment.is_none() || self.same_variant(segment, self.segment))
    }

    /// Check whether the document exists in this scope at all.
    pub fn document_applies(&self, document: &Document) -> bool {
        document
            .variations()
            .iter()
            .any(|variation| self.variation_applies(variation))
    }
}
