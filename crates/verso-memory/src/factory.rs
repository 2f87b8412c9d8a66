//! Factory for creating workspace connections.

use std::sync::Arc;

use verso_core::error::VersoResult;
use verso_core::{RepositoryConfig, RepositoryProvider, WorkspaceConnection};

use crate::connection::MemoryWorkspaceConnection;

/// Factory for creating workspace connections.
pub struct ConnectionFactory;

impl ConnectionFactory {
    /// Create a connection from the given configuration.
    pub async fn create(config: RepositoryConfig) -> VersoResult<Arc<dyn WorkspaceConnection>> {
        match config.provider {
            RepositoryProvider::Memory => Ok(Arc::new(MemoryWorkspaceConnection::new(config))),
        }
    }

    /// Create a connection configured from `VERSO_*` environment variables.
    pub async fn from_env() -> VersoResult<Arc<dyn WorkspaceConnection>> {
        Self::create(RepositoryConfig::from_env()?).await
    }
}
