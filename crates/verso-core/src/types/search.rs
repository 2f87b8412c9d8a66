//! Search request and response types.

use serde::{Deserialize, Serialize};

use super::resource::Resource;

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A backend-agnostic search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text; syntax depends on the backend's search engine.
    pub term: String,
    /// Restrict matching to these property paths (all when empty).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Property path to sort by, e.g. `properties.label`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchQuery {
    /// Create a query for the given text.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Builder: sort results by a property path.
    pub fn sorted_by(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(path.into());
        self.order = order;
        self
    }

    /// Builder: cap the number of hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Key of the matching resource.
    pub key: String,
    /// Relevance score, if the backend ranks hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// The matching resource.
    #[serde(rename = "_source")]
    pub source: Resource,
}

/// Search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of matches, which may exceed `hits.len()`.
    pub total: usize,
    pub hits: Vec<SearchHit>,
}
