//! Configuration system for verso.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{VersoError, VersoResult};
use crate::key::normalize_key;

/// Environment variable selecting the repository provider.
pub const ENV_PROVIDER: &str = "VERSO_PROVIDER";
/// Environment variable listing bootstrap projects, comma-separated.
pub const ENV_PROJECTS: &str = "VERSO_PROJECTS";
/// Environment variable toggling ancestor creation.
pub const ENV_CREATE_ANCESTORS: &str = "VERSO_CREATE_ANCESTORS";

/// Repository backend type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RepositoryProvider {
    /// Process-local store; nothing survives the process.
    #[default]
    Memory,
}

/// Main repository configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Backend to connect to.
    pub provider: RepositoryProvider,
    /// Projects created when the workspace is first produced.
    pub projects: Vec<String>,
    /// Whether `load_resource` with `create` also creates missing ancestors.
    pub create_ancestors: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            provider: RepositoryProvider::Memory,
            projects: Vec::new(),
            create_ancestors: true,
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> VersoResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| VersoError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            _ => {
                return Err(VersoError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        debug!(
            path = %path.as_ref().display(),
            provider = %config.provider,
            "Loaded repository config"
        );
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> VersoResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> VersoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(provider) = lookup(ENV_PROVIDER) {
            config.provider = provider.trim().parse().map_err(|_| {
                VersoError::Configuration(format!(
                    "unknown repository provider '{}' in {}",
                    provider, ENV_PROVIDER
                ))
            })?;
        }

        if let Some(projects) = lookup(ENV_PROJECTS) {
            config.projects = projects
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(flag) = lookup(ENV_CREATE_ANCESTORS) {
            config.create_ancestors = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(VersoError::Configuration(format!(
                        "invalid boolean '{}' in {}",
                        other, ENV_CREATE_ANCESTORS
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Normalized keys of the bootstrap projects, without duplicates.
    pub fn project_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.projects.len());
        for key in self.projects.iter().map(|p| normalize_key(p)) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }
}

/// Builder for RepositoryConfig.
#[derive(Default)]
pub struct RepositoryConfigBuilder {
    config: RepositoryConfig,
}

impl RepositoryConfigBuilder {
    /// Set the backend provider.
    pub fn provider(mut self, provider: RepositoryProvider) -> Self {
        self.config.provider = provider;
        self
    }

    /// Add a bootstrap project.
    pub fn project(mut self, key: impl Into<String>) -> Self {
        self.config.projects.push(key.into());
        self
    }

    /// Set whether missing ancestors are created.
    pub fn create_ancestors(mut self, enabled: bool) -> Self {
        self.config.create_ancestors = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RepositoryConfig {
        self.config
    }
}
