//! Append-only revision lists.

use std::collections::HashSet;

use verso_core::{Resource, RevisionQuery, Version, VersionRange};

/// Ordered revisions of one resource, oldest first.
///
/// The only mutator is [`append`](ResourceHistory::append); stored revisions
/// are never edited in place.
#[derive(Debug, Clone, Default)]
pub struct ResourceHistory {
    revisions: Vec<Resource>,
}

impl ResourceHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a revision and return the stored copy.
    pub fn append(&mut self, revision: Resource) -> &Resource {
        self.revisions.push(revision);
        &self.revisions[self.revisions.len() - 1]
    }

    /// The current revision.
    pub fn latest(&self) -> Option<&Resource> {
        self.revisions.last()
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Revisions in store order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Resource> {
        self.revisions.iter()
    }

    /// Most recent revision whose `updated` version falls in `range`.
    pub fn latest_in_range(&self, range: &VersionRange) -> Option<&Resource> {
        self.revisions
            .iter()
            .rev()
            .find(|revision| revision.updated().is_some_and(|v| range.contains(v)))
    }

    /// `updated` versions within `range`, oldest first.
    pub fn versions_in_range(&self, range: &VersionRange) -> Vec<Version> {
        self.revisions
            .iter()
            .filter_map(Resource::updated)
            .filter(|version| range.contains(version))
            .cloned()
            .collect()
    }

    /// Revisions whose `updated` version matches a requested version by id or
    /// by timestamp, in store order.
    ///
    /// Only fields set on the requested versions take part in matching.
    pub fn matching(&self, query: &RevisionQuery) -> Vec<Resource> {
        let ids: HashSet<&str> = query
            .versions
            .iter()
            .filter_map(Version::explicit_version_id)
            .collect();
        let timestamps: HashSet<i64> = query
            .versions
            .iter()
            .filter_map(Version::explicit_timestamp)
            .collect();

        self.revisions
            .iter()
            .filter(|revision| {
                revision.updated().is_some_and(|version| {
                    version
                        .explicit_version_id()
                        .is_some_and(|id| ids.contains(id))
                        || version
                            .explicit_timestamp()
                            .is_some_and(|ts| timestamps.contains(&ts))
                })
            })
            .cloned()
            .collect()
    }
}
