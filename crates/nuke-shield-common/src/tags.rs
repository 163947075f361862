//! `key:value` tag parsing

use crate::error::TagError;
use std::str::FromStr;

/// A tag that marks resources for preservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    /// aws-nuke filter property for this tag, e.g. `tag:Owner`
    pub fn property(&self) -> String {
        format!("tag:{}", self.key)
    }
}

impl FromStr for TagFilter {
    type Err = TagError;

    /// Split on the first colon, so values may themselves contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let Some((key, value)) = raw.split_once(':') else {
            return Err(TagError::MissingValue(raw.to_string()));
        };
        if key.is_empty() {
            return Err(TagError::EmptyKey(raw.to_string()));
        }
        if value.is_empty() {
            return Err(TagError::MissingValue(raw.to_string()));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parse every tag, skipping blank entries left by stray commas.
/// The first malformed tag fails the whole list.
pub fn parse_tags<I, S>(raw: I) -> Result<Vec<TagFilter>, TagError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter(|t| !t.as_ref().trim().is_empty())
        .map(|t| t.as_ref().parse())
        .collect()
}
