//! Optional JSON settings file
//!
//! Extends the built-in tables without recompiling:
//!
//! ```json
//! {
//!   "regions": ["eu-west-1"],
//!   "property_overrides": { "SNSTopic": ["TopicARN"], "EC2DHCPOption": ["tag:Shared", "true"] },
//!   "manual_filters": { "IAMRole": ["BreakGlass", { "property": "Name", "type": "contains", "value": "ops-" }] }
//! }
//! ```

use crate::error::ConfigError;
use crate::manual_filters::ManualFilters;
use crate::overrides::{PropertyOverride, PropertyOverrides};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Settings loaded from `--settings`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShieldSettings {
    /// Regions to search instead of the defaults
    pub regions: Vec<String>,
    /// Added to, or replacing, the built-in property overrides
    pub property_overrides: IndexMap<String, PropertyOverride>,
    /// Appended to the built-in manual filters
    pub manual_filters: ManualFilters,
}

impl ShieldSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Built-in overrides with these settings applied
    pub fn property_overrides(&self) -> PropertyOverrides {
        PropertyOverrides::builtin().with_all(self.property_overrides.clone())
    }

    /// Built-in manual filters with these settings appended
    pub fn manual_filters(&self) -> ManualFilters {
        let mut filters = ManualFilters::builtin();
        filters.merge(self.manual_filters.clone());
        filters
    }
}
