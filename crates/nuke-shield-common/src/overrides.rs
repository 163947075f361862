//! Per-type property overrides
//!
//! Some aws-nuke resource types can only be filtered through a specific
//! property rather than their default identifier. The table is built once
//! and passed to the block builders explicitly.

use crate::error::ConfigError;
use crate::filters::FilterEntry;
use indexmap::IndexMap;
use serde::Deserialize;

/// How resources of one aws-nuke type are matched
///
/// Deserializes from a one- or two-element string array:
/// `["TopicARN"]` or `["tag:Shared", "true"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub enum PropertyOverride {
    /// Match the resource identifier against `property`
    ByIdentifier { property: String },
    /// Match `property` against a fixed value, for resources that are only
    /// addressable through a group-level property
    Fixed { property: String, value: String },
}

impl PropertyOverride {
    pub fn by_identifier(property: impl Into<String>) -> Self {
        PropertyOverride::ByIdentifier {
            property: property.into(),
        }
    }

    pub fn property(&self) -> &str {
        match self {
            PropertyOverride::ByIdentifier { property } | PropertyOverride::Fixed { property, .. } => {
                property
            }
        }
    }

    /// Filter entry preserving the resource `identifier`
    pub fn entry_for(&self, identifier: &str) -> FilterEntry {
        match self {
            PropertyOverride::ByIdentifier { property } => {
                FilterEntry::property(property.as_str(), identifier)
            }
            PropertyOverride::Fixed { property, value } => {
                FilterEntry::property(property.as_str(), value.as_str())
            }
        }
    }
}

impl TryFrom<Vec<String>> for PropertyOverride {
    type Error = ConfigError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let len = parts.len();
        let mut iter = parts.into_iter();
        match (iter.next(), iter.next()) {
            _ if !(1..=2).contains(&len) => Err(ConfigError::InvalidOverride(len)),
            (Some(property), _) if property.is_empty() => Err(ConfigError::EmptyOverrideProperty),
            (Some(property), None) => Ok(PropertyOverride::ByIdentifier { property }),
            (Some(property), Some(value)) => Ok(PropertyOverride::Fixed { property, value }),
            (None, _) => Err(ConfigError::InvalidOverride(0)),
        }
    }
}

/// Immutable lookup from aws-nuke type to its override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOverrides {
    table: IndexMap<String, PropertyOverride>,
}

impl PropertyOverrides {
    /// No overrides: every type is matched by identifier
    pub fn empty() -> Self {
        Self::default()
    }

    /// Overrides required by aws-nuke out of the box
    pub fn builtin() -> Self {
        Self::empty()
            .with("SNSTopic", PropertyOverride::by_identifier("TopicARN"))
            .with("CloudFormationStack", PropertyOverride::by_identifier("Name"))
    }

    /// Add or replace the override for `type_name`
    pub fn with(mut self, type_name: impl Into<String>, policy: PropertyOverride) -> Self {
        self.table.insert(type_name.into(), policy);
        self
    }

    /// Add or replace every override in `extra`
    pub fn with_all<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, PropertyOverride)>,
    {
        self.table.extend(extra);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&PropertyOverride> {
        self.table.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
