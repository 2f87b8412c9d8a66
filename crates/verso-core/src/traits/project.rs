//! Project trait: keyed resource histories.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{VersoError, VersoResult};
use crate::types::{
    LoadOptions, Resource, RevisionQuery, SearchQuery, SearchResults, Version, VersionRange,
};

/// A namespace of keyed resource histories.
///
/// Every key maps to an append-only list of revisions; the last revision is
/// the current one. Keys passed to these methods are normalized by the
/// implementation, and returned resources are copies owned by the caller.
#[async_trait]
pub trait Project: Send + Sync {
    /// Normalized key of this project.
    fn project_key(&self) -> &str;

    /// Load the current revision of a resource.
    ///
    /// With `create`, a missing resource (and each missing ancestor) is
    /// created as an empty resource. Returns `None` when the resource does
    /// not exist and `create` is not set.
    async fn load_resource(&self, key: &str, options: &LoadOptions)
        -> VersoResult<Option<Resource>>;

    /// Load several resources, keyed by normalized key. Keys that do not
    /// resolve are left out of the map.
    async fn load_resources(
        &self,
        keys: &[String],
        options: &LoadOptions,
    ) -> VersoResult<HashMap<String, Resource>>;

    /// Load the direct children of a key.
    async fn load_child_resources(&self, key: &str) -> VersoResult<HashMap<String, Resource>>;

    /// Remove a resource with its entire history.
    ///
    /// Returns `false` if the resource did not exist.
    async fn delete_resource(&self, key: &str) -> VersoResult<bool>;

    /// Append a new revision of a resource and return the stored revision.
    async fn store_resource(&self, resource: Resource) -> VersoResult<Resource>;

    /// For every resource, the most recent revision updated within `range`.
    async fn load_modified_resources(
        &self,
        range: &VersionRange,
    ) -> VersoResult<HashMap<String, Resource>>;

    /// Versions of all revisions of a resource within `range`, oldest first.
    async fn load_resource_history(
        &self,
        key: &str,
        range: &VersionRange,
    ) -> VersoResult<Vec<Version>>;

    /// Revisions of a resource matching the requested versions, in store order.
    async fn load_resource_revisions(
        &self,
        key: &str,
        query: &RevisionQuery,
    ) -> VersoResult<Vec<Resource>>;

    /// Search resources. Backends without a search engine keep this default.
    async fn search_resources(&self, query: &SearchQuery) -> VersoResult<SearchResults> {
        let _ = query;
        Err(VersoError::unsupported("search_resources"))
    }
}
