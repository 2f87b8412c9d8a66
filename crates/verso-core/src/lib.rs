//! verso-core - Core library for verso.
//!
//! This crate provides the types, traits, and configuration shared by verso
//! repository backends: normalized keys, comparable [`Version`] stamps,
//! [`Resource`] property bags, and the [`WorkspaceConnection`] → [`Workspace`]
//! → [`Project`] access chain.
//!
//! # Example
//!
//! ```ignore
//! use verso_core::{open_project, LoadOptions, Resource};
//!
//! let project = open_project(connection.as_ref(), "website").await?;
//!
//! let mut readme = Resource::new("README.txt");
//! readme.set_property("title", "Hello".into());
//! let stored = project.store_resource(readme).await?;
//!
//! let history = project
//!     .load_resource_history("README.txt", &Default::default())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{RepositoryConfig, RepositoryConfigBuilder, RepositoryProvider};
pub use error::{ErrorCode, VersoError, VersoResult};
pub use key::{is_direct_child, normalize_key, parent_key};
pub use traits::{open_project, Project, Workspace, WorkspaceConnection};
pub use types::{
    LoadOptions, PropertyMap, Resource, RevisionQuery, SearchHit, SearchQuery, SearchResults,
    SortOrder, SystemProperties, Version, VersionRange,
};
