//! Version stamps attached to resource revisions.

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::VersoError;

/// A comparable point-in-time stamp with an optional identity.
///
/// A version carries a millisecond `timestamp` and/or a `version_id`. Both are
/// optional at construction. An unset timestamp is fixed to the current time
/// the first time it is read, so an uninitialized version freezes at first
/// use rather than at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VersionInput", into = "VersionRepr")]
pub struct Version {
    timestamp: OnceCell<i64>,
    version_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_id: Option<String>,
}

// Accepted JSON forms: a bare timestamp, a numeric string, or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionInput {
    Timestamp(i64),
    Text(String),
    Fields(VersionRepr),
}

impl From<VersionRepr> for Version {
    fn from(repr: VersionRepr) -> Self {
        let timestamp = OnceCell::new();
        if let Some(ts) = repr.timestamp {
            let _ = timestamp.set(ts);
        }
        Self {
            timestamp,
            version_id: repr.version_id,
        }
    }
}

impl TryFrom<VersionInput> for Version {
    type Error = VersoError;

    fn try_from(input: VersionInput) -> Result<Self, Self::Error> {
        match input {
            VersionInput::Timestamp(ts) => Ok(Version::at(ts)),
            VersionInput::Text(text) => text.parse(),
            VersionInput::Fields(repr) => Ok(repr.into()),
        }
    }
}

impl From<Version> for VersionRepr {
    fn from(version: Version) -> Self {
        Self {
            timestamp: version.timestamp.get().copied(),
            version_id: version.version_id,
        }
    }
}

impl Version {
    /// Create a version with no timestamp and no id.
    pub fn new() -> Self {
        Self::default()
    }

    /// The oldest possible version.
    pub fn origin() -> Self {
        Self::at(0)
    }

    /// Create a version with only a timestamp.
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp: OnceCell::with_value(timestamp),
            version_id: None,
        }
    }

    /// Create a version with both a timestamp and an explicit id.
    pub fn with_id(timestamp: i64, version_id: impl Into<String>) -> Self {
        Self {
            timestamp: OnceCell::with_value(timestamp),
            version_id: Some(version_id.into()),
        }
    }

    /// Create a version identified only by its id.
    pub fn from_id(version_id: impl Into<String>) -> Self {
        Self {
            timestamp: OnceCell::new(),
            version_id: Some(version_id.into()),
        }
    }

    /// Current time in epoch milliseconds, used for lazily assigned timestamps.
    pub fn new_timestamp() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Timestamp of this version, fixed to "now" on first read if unset.
    pub fn timestamp(&self) -> i64 {
        *self.timestamp.get_or_init(Self::new_timestamp)
    }

    /// Whether a timestamp has been assigned, either explicitly or by a read.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.get().is_some()
    }

    /// The timestamp if one has been assigned, without resolving it.
    pub fn explicit_timestamp(&self) -> Option<i64> {
        self.timestamp.get().copied()
    }

    /// The explicit version id, if one was set.
    pub fn explicit_version_id(&self) -> Option<&str> {
        self.version_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Version id, falling back to the string form of the timestamp.
    pub fn version_id(&self) -> String {
        match self.explicit_version_id() {
            Some(id) => id.to_string(),
            None => self.timestamp().to_string(),
        }
    }

    /// Compare two versions.
    ///
    /// Timestamps are compared numerically when both sides have one. When a
    /// side has no timestamp yet and both carry explicit ids, the ids are
    /// compared lexicographically. Otherwise missing timestamps are resolved
    /// to "now" and compared numerically.
    pub fn compare_to(&self, other: &Version) -> Ordering {
        if let (Some(a), Some(b)) = (self.timestamp.get(), other.timestamp.get()) {
            return a.cmp(b);
        }
        if let (Some(a), Some(b)) = (self.explicit_version_id(), other.explicit_version_id()) {
            return a.cmp(b);
        }
        self.timestamp().cmp(&other.timestamp())
    }

    /// Whether this version lies in `[from, to]`, both ends inclusive.
    pub fn in_range(&self, from: &Version, to: &Version) -> bool {
        self.compare_to(from) != Ordering::Less && self.compare_to(to) != Ordering::Greater
    }
}

impl From<i64> for Version {
    fn from(timestamp: i64) -> Self {
        Self::at(timestamp)
    }
}

impl FromStr for Version {
    type Err = VersoError;

    /// Parse a bare numeric string as a timestamp.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Version::at)
            .map_err(|_| VersoError::invalid_version(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
