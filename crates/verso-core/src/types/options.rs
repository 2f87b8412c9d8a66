//! Option and query types accepted by project and workspace operations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::version::Version;

/// Options for loading resources and projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Create the target if it does not exist yet.
    #[serde(default)]
    pub create: bool,
}

impl LoadOptions {
    /// Options that create missing targets.
    pub fn create_missing() -> Self {
        Self { create: true }
    }
}

/// An inclusive range of versions.
///
/// A missing `from` starts at the oldest possible version; a missing `to`
/// leaves the range open towards the newest revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Version>,
}

impl VersionRange {
    /// The range covering every version.
    pub fn all() -> Self {
        Self::default()
    }

    /// The range `[from, to]`.
    pub fn between(from: Version, to: Version) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Every version at or after `from`.
    pub fn since(from: Version) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Every version at or before `to`.
    pub fn until(to: Version) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// Lower bound, defaulting to [`Version::origin`].
    pub fn lower_bound(&self) -> Version {
        self.from.clone().unwrap_or_else(Version::origin)
    }

    /// Whether `version` falls inside this range.
    pub fn contains(&self, version: &Version) -> bool {
        let from = self.lower_bound();
        if version.compare_to(&from) == Ordering::Less {
            return false;
        }
        match &self.to {
            Some(to) => version.compare_to(to) != Ordering::Greater,
            None => true,
        }
    }
}

/// Selects stored revisions by version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionQuery {
    /// Target versions; a revision matches by version id or by timestamp.
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl RevisionQuery {
    /// Create a query for the given versions.
    pub fn new(versions: Vec<Version>) -> Self {
        Self { versions }
    }
}

impl From<Vec<Version>> for RevisionQuery {
    fn from(versions: Vec<Version>) -> Self {
        Self::new(versions)
    }
}
