//! aws-nuke resource type catalog
//!
//! The catalog is the output of `aws-nuke resource-types`: one supported
//! type name per line. It is loaded once per run and only read afterwards.

use indexmap::IndexSet;

/// Immutable list of resource types understood by aws-nuke
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTypeCatalog {
    types: IndexSet<String>,
}

impl TargetTypeCatalog {
    /// Parse newline-delimited catalog text. Lines are trimmed, blank lines
    /// dropped and duplicates collapsed, keeping first-seen order.
    pub fn parse(text: &str) -> Self {
        Self::from_types(text.lines())
    }

    /// Build a catalog from type names
    pub fn from_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            types: types
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    /// All catalog types containing `needle` as a substring, in catalog order
    pub fn containing<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |t| t.contains(needle))
    }
}
