//! In-memory project.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use verso_core::error::VersoResult;
use verso_core::{
    is_direct_child, normalize_key, parent_key, LoadOptions, Project, Resource, RevisionQuery,
    Version, VersionRange,
};

use crate::history::ResourceHistory;

/// Mutable state of a project, guarded by one lock.
#[derive(Debug, Default)]
struct ProjectState {
    version_counter: u64,
    current_version: Option<Version>,
    last_timestamp: i64,
    resources: HashMap<String, ResourceHistory>,
}

impl ProjectState {
    /// The project's current version.
    ///
    /// A new version is minted when none exists yet or when `advance` is set.
    /// Minted timestamps are strictly increasing within a project, and ids are
    /// zero-padded so they order the same way as strings.
    fn project_version(&mut self, advance: bool) -> Version {
        if let (false, Some(version)) = (advance, &self.current_version) {
            return version.clone();
        }
        let timestamp = Version::new_timestamp().max(self.last_timestamp + 1);
        let version = Version::with_id(timestamp, format!("{:020}", self.version_counter));
        self.last_timestamp = timestamp;
        self.version_counter += 1;
        self.current_version = Some(version.clone());
        version
    }

    fn latest(&self, key: &str) -> Option<Resource> {
        self.resources
            .get(key)
            .and_then(ResourceHistory::latest)
            .map(Resource::copy)
    }

    /// Make sure `key` has a history, creating ancestors first when asked.
    ///
    /// Resources created here are empty and stamped with the current project
    /// version; the version counter does not move.
    fn ensure(&mut self, key: &str, create_ancestors: bool) {
        let mut missing = Vec::new();
        let mut next = Some(key);
        while let Some(current) = next {
            if !self.resources.contains_key(current) {
                missing.push(current.to_string());
            }
            next = if create_ancestors {
                parent_key(current)
            } else {
                None
            };
        }

        for key in missing.into_iter().rev() {
            let mut resource = Resource::new(&key);
            resource.update_version(self.project_version(false));
            debug!(key = %key, "Created empty resource");
            self.resources
                .entry(key)
                .or_insert_with(ResourceHistory::new)
                .append(resource);
        }
    }
}

/// A project whose resource histories live in process memory.
pub struct MemoryProject {
    key: String,
    create_ancestors: bool,
    state: RwLock<ProjectState>,
}

impl MemoryProject {
    /// Create an empty project. The key is normalized.
    pub fn new(key: &str, create_ancestors: bool) -> Self {
        Self {
            key: normalize_key(key),
            create_ancestors,
            state: RwLock::new(ProjectState::default()),
        }
    }

    /// Number of keys with a stored history.
    pub async fn resource_count(&self) -> usize {
        self.state.read().await.resources.len()
    }
}

impl std::fmt::Debug for MemoryProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProject")
            .field("key", &self.key)
            .field("create_ancestors", &self.create_ancestors)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Project for MemoryProject {
    fn project_key(&self) -> &str {
        &self.key
    }

    async fn load_resource(
        &self,
        key: &str,
        options: &LoadOptions,
    ) -> VersoResult<Option<Resource>> {
        let key = normalize_key(key);
        if options.create {
            let mut state = self.state.write().await;
            state.ensure(&key, self.create_ancestors);
            Ok(state.latest(&key))
        } else {
            Ok(self.state.read().await.latest(&key))
        }
    }

    async fn load_resources(
        &self,
        keys: &[String],
        options: &LoadOptions,
    ) -> VersoResult<HashMap<String, Resource>> {
        let keys: Vec<String> = keys.iter().map(|key| normalize_key(key)).collect();
        let mut result = HashMap::with_capacity(keys.len());
        if options.create {
            let mut state = self.state.write().await;
            for key in keys {
                state.ensure(&key, self.create_ancestors);
                if let Some(resource) = state.latest(&key) {
                    result.insert(key, resource);
                }
            }
        } else {
            let state = self.state.read().await;
            for key in keys {
                if let Some(resource) = state.latest(&key) {
                    result.insert(key, resource);
                }
            }
        }
        Ok(result)
    }

    async fn load_child_resources(&self, key: &str) -> VersoResult<HashMap<String, Resource>> {
        let prefix = normalize_key(key);
        let state = self.state.read().await;
        Ok(state
            .resources
            .iter()
            .filter(|(key, _)| is_direct_child(&prefix, key))
            .filter_map(|(key, history)| {
                history.latest().map(|resource| (key.clone(), resource.copy()))
            })
            .collect())
    }

    async fn delete_resource(&self, key: &str) -> VersoResult<bool> {
        let key = normalize_key(key);
        let removed = self.state.write().await.resources.remove(&key).is_some();
        debug!(project = %self.key, key = %key, removed, "Deleted resource");
        Ok(removed)
    }

    async fn store_resource(&self, mut resource: Resource) -> VersoResult<Resource> {
        let key = normalize_key(resource.key());
        resource.set_key(&key);

        let mut state = self.state.write().await;
        let version = state.project_version(true);
        resource.update_version(version);

        let history = state.resources.entry(key).or_insert_with(ResourceHistory::new);
        let stored = history.append(resource).copy();
        debug!(
            project = %self.key,
            key = %stored.key(),
            revisions = history.len(),
            "Stored resource"
        );
        Ok(stored)
    }

    async fn load_modified_resources(
        &self,
        range: &VersionRange,
    ) -> VersoResult<HashMap<String, Resource>> {
        let state = self.state.read().await;
        Ok(state
            .resources
            .iter()
            .filter_map(|(key, history)| {
                history
                    .latest_in_range(range)
                    .map(|resource| (key.clone(), resource.copy()))
            })
            .collect())
    }

    async fn load_resource_history(
        &self,
        key: &str,
        range: &VersionRange,
    ) -> VersoResult<Vec<Version>> {
        let key = normalize_key(key);
        let state = self.state.read().await;
        Ok(state
            .resources
            .get(&key)
            .map(|history| history.versions_in_range(range))
            .unwrap_or_default())
    }

    async fn load_resource_revisions(
        &self,
        key: &str,
        query: &RevisionQuery,
    ) -> VersoResult<Vec<Resource>> {
        let key = normalize_key(key);
        let state = self.state.read().await;
        Ok(state
            .resources
            .get(&key)
            .map(|history| history.matching(query))
            .unwrap_or_default())
    }
}
