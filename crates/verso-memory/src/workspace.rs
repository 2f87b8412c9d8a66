//! In-memory workspace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use verso_core::error::VersoResult;
use verso_core::{normalize_key, LoadOptions, Project, RepositoryConfig, Workspace};

use crate::project::MemoryProject;

/// A registry of [`MemoryProject`]s keyed by normalized project key.
pub struct MemoryWorkspace {
    create_ancestors: bool,
    projects: RwLock<HashMap<String, Arc<MemoryProject>>>,
}

impl MemoryWorkspace {
    /// Create an empty workspace whose projects create missing ancestors.
    pub fn new() -> Self {
        Self::from_config(&RepositoryConfig::default())
    }

    /// Create a workspace holding the bootstrap projects of `config`.
    pub fn from_config(config: &RepositoryConfig) -> Self {
        let projects = config
            .project_keys()
            .into_iter()
            .map(|key| {
                let project = Arc::new(MemoryProject::new(&key, config.create_ancestors));
                (key, project)
            })
            .collect();
        Self {
            create_ancestors: config.create_ancestors,
            projects: RwLock::new(projects),
        }
    }

    /// Number of registered projects.
    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }
}

impl Default for MemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workspace for MemoryWorkspace {
    async fn load_projects(&self) -> VersoResult<HashMap<String, Arc<dyn Project>>> {
        let projects = self.projects.read().await;
        Ok(projects
            .iter()
            .map(|(key, project)| (key.clone(), project.clone() as Arc<dyn Project>))
            .collect())
    }

    async fn load_project(
        &self,
        key: &str,
        options: &LoadOptions,
    ) -> VersoResult<Option<Arc<dyn Project>>> {
        let key = normalize_key(key);
        if let Some(project) = self.projects.read().await.get(&key) {
            return Ok(Some(project.clone() as Arc<dyn Project>));
        }
        if !options.create {
            return Ok(None);
        }

        let mut projects = self.projects.write().await;
        let project = projects
            .entry(key)
            .or_insert_with_key(|key| {
                debug!(project = %key, "Created project");
                Arc::new(MemoryProject::new(key, self.create_ancestors))
            })
            .clone();
        Ok(Some(project as Arc<dyn Project>))
    }

    async fn delete_project(&self, key: &str) -> VersoResult<bool> {
        let key = normalize_key(key);
        let removed = self.projects.write().await.remove(&key).is_some();
        debug!(project = %key, removed, "Deleted project");
        Ok(removed)
    }
}
