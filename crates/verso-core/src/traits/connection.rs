//! Workspace connection trait.

use async_trait::async_trait;
use std::sync::Arc;

use super::project::Project;
use super::workspace::Workspace;
use crate::error::{VersoError, VersoResult};
use crate::types::LoadOptions;

/// Main access point: produces the workspace behind a backend.
///
/// A connection owns exactly one workspace for its lifetime; repeated calls
/// to [`connect`](WorkspaceConnection::connect) return the same instance.
#[async_trait]
pub trait WorkspaceConnection: Send + Sync {
    /// Connect to the underlying workspace.
    async fn connect(&self) -> VersoResult<Arc<dyn Workspace>>;
}

/// Connect and load (creating if needed) the project with the given key.
pub async fn open_project(
    connection: &dyn WorkspaceConnection,
    key: &str,
) -> VersoResult<Arc<dyn Project>> {
    let workspace = connection.connect().await?;
    workspace
        .load_project(key, &LoadOptions::create_missing())
        .await?
        .ok_or_else(|| {
            VersoError::internal(format!("backend did not create project '{}'", key))
        })
}
