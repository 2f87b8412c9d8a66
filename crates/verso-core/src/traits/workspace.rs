//! Workspace trait: a registry of projects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::project::Project;
use crate::error::VersoResult;
use crate::types::LoadOptions;

/// Gives access to all projects available to a client.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Load every project, keyed by project key. Iteration order is unspecified.
    async fn load_projects(&self) -> VersoResult<HashMap<String, Arc<dyn Project>>>;

    /// Load one project; with `create`, a missing project is created.
    async fn load_project(
        &self,
        key: &str,
        options: &LoadOptions,
    ) -> VersoResult<Option<Arc<dyn Project>>>;

    /// Remove a project. Returns `false` if it did not exist.
    async fn delete_project(&self, key: &str) -> VersoResult<bool>;
}
