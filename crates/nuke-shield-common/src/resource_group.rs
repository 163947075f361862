//! Resources grouped by CloudFormation type
//!
//! [`ResourceGroup`] is built during discovery and read by the assembler.
//! [`UnmatchedResources`] collects groups whose type could not be mapped to
//! an aws-nuke type, for the end-of-run report.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Resource identifiers keyed by source type, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceGroup {
    by_type: IndexMap<String, IndexSet<String>>,
}

impl ResourceGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one identifier. Returns false if it was already present.
    pub fn insert(&mut self, resource_type: impl Into<String>, id: impl Into<String>) -> bool {
        self.by_type
            .entry(resource_type.into())
            .or_default()
            .insert(id.into())
    }

    /// Record many identifiers of one type
    pub fn extend<I, S>(&mut self, resource_type: impl Into<String>, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_type
            .entry(resource_type.into())
            .or_default()
            .extend(ids.into_iter().map(Into::into));
    }

    /// Append every group of `other`, keeping this group's order first
    pub fn merge(&mut self, other: ResourceGroup) {
        for (resource_type, ids) in other.by_type {
            self.extend(resource_type, ids);
        }
    }

    pub fn get(&self, resource_type: &str) -> Option<&IndexSet<String>> {
        self.by_type.get(resource_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.by_type.iter().map(|(t, ids)| (t.as_str(), ids))
    }

    /// Number of distinct types
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Total number of identifiers across all types
    pub fn resource_count(&self) -> usize {
        self.by_type.values().map(IndexSet::len).sum()
    }
}

/// Resources whose type had no aws-nuke mapping. Never written to the
/// generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnmatchedResources {
    by_type: IndexMap<String, Vec<String>>,
}

impl UnmatchedResources {
    pub fn record<'a, I>(&mut self, resource_type: &str, ids: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.by_type
            .entry(resource_type.to_string())
            .or_default()
            .extend(ids.into_iter().cloned());
    }

    pub fn get(&self, resource_type: &str) -> Option<&[String]> {
        self.by_type.get(resource_type).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_type.iter().map(|(t, ids)| (t.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }
}
