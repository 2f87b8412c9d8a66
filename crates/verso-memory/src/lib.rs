//! verso-memory - In-memory repository backend for verso.
//!
//! Every project keeps its resource histories in process memory behind a
//! `tokio` read/write lock. Nothing is persisted; dropping the connection
//! drops the data.
//!
//! # Example
//!
//! ```ignore
//! use verso_core::{open_project, RepositoryConfig, Resource, VersionRange};
//! use verso_memory::ConnectionFactory;
//!
//! let connection = ConnectionFactory::create(RepositoryConfig::default()).await?;
//! let project = open_project(connection.as_ref(), "website").await?;
//!
//! project.store_resource(Resource::new("README.txt")).await?;
//! let versions = project
//!     .load_resource_history("README.txt", &VersionRange::all())
//!     .await?;
//! ```

pub mod connection;
pub mod factory;
pub mod history;
pub mod project;
pub mod workspace;

pub use connection::MemoryWorkspaceConnection;
pub use factory::ConnectionFactory;
pub use history::ResourceHistory;
pub use project::MemoryProject;
pub use workspace::MemoryWorkspace;
