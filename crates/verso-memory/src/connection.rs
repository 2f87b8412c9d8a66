//! In-memory workspace connection.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use verso_core::error::VersoResult;
use verso_core::{RepositoryConfig, Workspace, WorkspaceConnection};

use crate::workspace::MemoryWorkspace;

/// Connection to a process-local workspace.
///
/// The workspace is built on the first [`connect`](WorkspaceConnection::connect)
/// and shared by every later call on the same connection.
pub struct MemoryWorkspaceConnection {
    config: RepositoryConfig,
    workspace: OnceCell<Arc<MemoryWorkspace>>,
}

impl MemoryWorkspaceConnection {
    pub fn new(config: RepositoryConfig) -> Self {
        Self {
            config,
            workspace: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The concrete workspace behind this connection.
    pub fn workspace(&self) -> Arc<MemoryWorkspace> {
        self.workspace
            .get_or_init(|| {
                let workspace = MemoryWorkspace::from_config(&self.config);
                info!(
                    projects = self.config.projects.len(),
                    create_ancestors = self.config.create_ancestors,
                    "Created in-memory workspace"
                );
                Arc::new(workspace)
            })
            .clone()
    }
}

impl Default for MemoryWorkspaceConnection {
    fn default() -> Self {
        Self::new(RepositoryConfig::default())
    }
}

#[async_trait]
impl WorkspaceConnection for MemoryWorkspaceConnection {
    async fn connect(&self) -> VersoResult<Arc<dyn Workspace>> {
        Ok(self.workspace())
    }
}
