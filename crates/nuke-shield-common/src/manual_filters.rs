//! Fixed preservation rules for operator-managed resources
//!
//! These resources belong to account-level tooling (StackSet execution,
//! Control Tower, SAML federation) and are never members of a discovered
//! stack, so they are preserved by name instead.

use crate::defaults::{ROLE_POLICY_ATTACHMENT_TYPE, ROLE_POLICY_TYPE, ROLE_TYPE};
use crate::filters::{FilterEntry, MatchType};
use indexmap::IndexMap;
use serde::Deserialize;

const STACKSET_EXECUTION_ROLE: &str = "AWSCloudFormationStackSetExecutionRole";
const STACKSET_EXEC_PREFIX: &str = "stacksets-exec";
const CONTROL_TOWER_MARKER: &str = "aws-controltower";
const DO_NOT_DELETE_MARKER: &str = "DO_NOT_DELETE";

/// Filter entries keyed by aws-nuke type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ManualFilters {
    by_type: IndexMap<String, Vec<FilterEntry>>,
}

impl ManualFilters {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules for resources every managed account carries
    pub fn builtin() -> Self {
        let mut filters = Self::empty();
        filters.add(ROLE_TYPE, FilterEntry::literal(STACKSET_EXECUTION_ROLE));
        filters.add(
            ROLE_TYPE,
            FilterEntry::property("Name", STACKSET_EXEC_PREFIX).with_match_type(MatchType::Contains),
        );
        filters.add(
            ROLE_POLICY_TYPE,
            FilterEntry::property("role:RoleName", STACKSET_EXECUTION_ROLE),
        );
        filters.add(
            ROLE_POLICY_ATTACHMENT_TYPE,
            FilterEntry::property("RoleName", STACKSET_EXEC_PREFIX)
                .with_match_type(MatchType::Contains),
        );
        filters.add("IAMSAMLProvider", FilterEntry::contains(DO_NOT_DELETE_MARKER));
        for type_name in [
            "SNSSubscription",
            "CloudWatchEventsRule",
            "CloudWatchEventsTarget",
        ] {
            filters.add(type_name, FilterEntry::contains(CONTROL_TOWER_MARKER));
        }
        filters
    }

    pub fn add(&mut self, type_name: impl Into<String>, entry: FilterEntry) {
        self.by_type.entry(type_name.into()).or_default().push(entry);
    }

    /// Append every rule of `other` after this table's rules
    pub fn merge(&mut self, other: ManualFilters) {
        for (type_name, entries) in other.by_type {
            self.by_type.entry(type_name).or_default().extend(entries);
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&[FilterEntry]> {
        self.by_type.get(type_name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FilterEntry])> {
        self.by_type
            .iter()
            .map(|(t, entries)| (t.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules() {
        let filters = ManualFilters::builtin();
        assert_eq!(filters.len(), 7);
        assert_eq!(filters.get("IAMRole").unwrap().len(), 2);
        assert_eq!(
            filters.get("IAMRole").unwrap()[0],
            FilterEntry::literal("AWSCloudFormationStackSetExecutionRole")
        );
        assert_eq!(
            filters.get("CloudWatchEventsTarget").unwrap(),
            &[FilterEntry::contains("aws-controltower")]
        );
    }

    #[test]
    fn test_merge_appends() {
        let mut filters = ManualFilters::builtin();
        let extra: ManualFilters =
            serde_json::from_str(r#"{"IAMRole": ["BreakGlass"], "S3Bucket": [{"type": "glob", "value": "logs-*"}]}"#)
                .unwrap();
        filters.merge(extra);

        assert_eq!(filters.len(), 8);
        assert_eq!(filters.get("IAMRole").unwrap().len(), 3);
        assert_eq!(
            filters.get("IAMRole").unwrap()[2],
            FilterEntry::literal("BreakGlass")
        );
        assert_eq!(filters.iter().last().unwrap().0, "S3Bucket");
    }
}
