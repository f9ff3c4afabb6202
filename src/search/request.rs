//! Search request and result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::document::DocumentRef;
use crate::error::{QuiverError, Result};
use crate::search::access::AccessContext;
use crate::search::facet::{Facet, FacetKind, FacetResult};
use crate::search::filter::{Filter, FilterKind};
use crate::search::sorter::Sorter;

/// Everything a single search call needs besides the index alias.
///
/// # Examples
///
/// ```
/// use quiver::search::facet::Facet;
/// use quiver::search::filter::Filter;
/// use quiver::search::request::SearchRequest;
///
/// let request = SearchRequest::new()
///     .query("rust")
///     .filter(Filter::keyword("tags", ["guide"]))
///     .facet(Facet::keyword("tags"))
///     .culture("en-US")
///     .take(20);
///
/// assert_eq!(request.take, Some(20));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free text matched as a case-insensitive substring of any text.
    ///
    /// Leading and trailing whitespace is trimmed before matching, and a
    /// query that is blank after trimming applies no text constraint.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub facets: Vec<Facet>,
    /// Empty means relevance order.
    #[serde(default)]
    pub sorters: Vec<Sorter>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub access_context: Option<AccessContext>,
    #[serde(default)]
    pub skip: usize,
    /// `None` uses the engine's default page size.
    #[serde(default)]
    pub take: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a request from JSON.
    ///
    /// Filter, facet and sorter kinds are checked before decoding so an
    /// unknown kind is reported by name rather than as a generic parse error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        check_kinds(&raw, "filters", "filter", FilterKind::KINDS)?;
        check_kinds(&raw, "facets", "facet", FacetKind::KINDS)?;
        check_kinds(&raw, "sorters", "sorter", Sorter::KINDS)?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Set the free-text query. It is trimmed at search time; see
    /// [`SearchRequest::effective_query`].
    pub fn query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn sorter(mut self, sorter: Sorter) -> Self {
        self.sorters.push(sorter);
        self
    }

    pub fn culture<S: Into<String>>(mut self, culture: S) -> Self {
        self.culture = Some(culture.into());
        self
    }

    pub fn segment<S: Into<String>>(mut self, segment: S) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn access_context(mut self, context: AccessContext) -> Self {
        self.access_context = Some(context);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// The trimmed query, if there is anything to match.
    pub fn effective_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

fn check_kinds(raw: &Value, key: &str, family: &str, known: &[&str]) -> Result<()> {
    let Some(items) = raw.get(key).and_then(Value::as_array) else {
        return Ok(());
    };

    for item in items {
        if let Some(kind) = item.get("kind").and_then(Value::as_str)
            && !known.contains(&kind)
        {
            return Err(QuiverError::unsupported_kind(family, kind));
        }
    }
    Ok(())
}

/// The outcome of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matches after filtering, before pagination.
    pub total: u64,
    pub documents: Vec<DocumentRef>,
    /// One entry per requested facet, in request order.
    pub facets: Vec<FacetResult>,
}

impl SearchResult {
    /// The facet result for a field, if it was requested.
    pub fn facet(&self, field_name: &str) -> Option<&FacetResult> {
        self.facets.iter().find(|facet| facet.field_name == field_name)
    }
}
