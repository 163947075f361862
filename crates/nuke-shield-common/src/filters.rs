//! aws-nuke filter entries and block builders
//!
//! Entries are modelled structurally and only rendered to text once the
//! assembler knows which section they go into, so their indentation always
//! follows the section they are spliced under.

use crate::defaults::{INDENT_STEP, ROLE_POLICY_ATTACHMENT_TYPE, ROLE_POLICY_TYPE, ROLE_TYPE};
use crate::overrides::PropertyOverrides;
use crate::tags::TagFilter;
use serde::{Deserialize, Serialize};

/// aws-nuke filter comparison types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Contains,
    Glob,
    Regex,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Contains => "contains",
            MatchType::Glob => "glob",
            MatchType::Regex => "regex",
        }
    }
}

/// Property/value matcher. Without a property, aws-nuke matches against
/// the resource's default identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    pub value: String,
}

/// One preservation rule under a resource type section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterEntry {
    /// Exact match on the resource's identifier
    Literal(String),
    Matcher(PropertyMatch),
}

impl FilterEntry {
    pub fn literal(value: impl Into<String>) -> Self {
        FilterEntry::Literal(value.into())
    }

    /// `property: <property>` / `value: <value>`
    pub fn property(property: impl Into<String>, value: impl Into<String>) -> Self {
        FilterEntry::Matcher(PropertyMatch {
            property: Some(property.into()),
            match_type: None,
            value: value.into(),
        })
    }

    /// Identifier contains `value`
    pub fn contains(value: impl Into<String>) -> Self {
        FilterEntry::Matcher(PropertyMatch {
            property: None,
            match_type: Some(MatchType::Contains),
            value: value.into(),
        })
    }

    /// Set the comparison type of a matcher. Literals are unchanged.
    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        if let FilterEntry::Matcher(m) = &mut self {
            m.match_type = Some(match_type);
        }
        self
    }

    /// Render as YAML list item lines starting at column `indent`
    pub fn render(&self, indent: usize) -> Vec<String> {
        let pad = " ".repeat(indent);
        match self {
            FilterEntry::Literal(value) => vec![format!("{pad}- {}", quoted(value))],
            FilterEntry::Matcher(m) => {
                let mut fields = Vec::with_capacity(3);
                if let Some(property) = &m.property {
                    fields.push(format!("property: {}", scalar(property)));
                }
                if let Some(match_type) = m.match_type {
                    fields.push(format!("type: {}", match_type.as_str()));
                }
                fields.push(format!("value: {}", scalar(&m.value)));

                fields
                    .into_iter()
                    .enumerate()
                    .map(|(i, field)| {
                        if i == 0 {
                            format!("{pad}- {field}")
                        } else {
                            format!("{pad}  {field}")
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Render every entry at `indent`
pub fn render_entries(entries: &[FilterEntry], indent: usize) -> Vec<String> {
    entries.iter().flat_map(|e| e.render(indent)).collect()
}

/// Render a section header followed by its entries one level deeper
pub fn render_section(type_name: &str, entries: &[FilterEntry], indent: usize) -> Vec<String> {
    let mut lines = vec![format!("{}{type_name}:", " ".repeat(indent))];
    lines.extend(render_entries(entries, indent + INDENT_STEP));
    lines
}

/// Plain list items, used for the type exclusion list
pub fn render_list(items: &[&str], indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    items
        .iter()
        .map(|item| format!("{pad}- {}", scalar(item)))
        .collect()
}

/// Entries for a group of resources mapped to `target_type`.
///
/// Types with a property override are matched through that property,
/// everything else by identifier.
pub fn resource_entries<'a, I>(
    target_type: &str,
    identifiers: I,
    overrides: &PropertyOverrides,
) -> Vec<FilterEntry>
where
    I: IntoIterator<Item = &'a String>,
{
    let policy = overrides.get(target_type);
    identifiers
        .into_iter()
        .map(|id| match policy {
            Some(o) => o.entry_for(id),
            None => FilterEntry::literal(id.as_str()),
        })
        .collect()
}

/// One `property: tag:<key>` / `value: <value>` entry per tag
pub fn tag_entries(tags: &[TagFilter]) -> Vec<FilterEntry> {
    tags.iter()
        .map(|t| FilterEntry::property(t.property(), t.value.as_str()))
        .collect()
}

/// Entries destined for a section other than the mapped type's own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentBlock {
    pub target_type: &'static str,
    pub entries: Vec<FilterEntry>,
}

/// All filter entries produced for one mapped resource group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBlocks {
    pub target_type: String,
    pub entries: Vec<FilterEntry>,
    pub dependents: Vec<DependentBlock>,
}

/// Build the blocks for a resource group mapped to `target_type`.
///
/// Preserving an IAM role does not preserve its inline policies or policy
/// attachments, which aws-nuke tracks as separate types, so role groups also
/// get matching blocks for both keyed by role name.
pub fn build_blocks(
    target_type: &str,
    identifiers: &indexmap::IndexSet<String>,
    overrides: &PropertyOverrides,
) -> TypeBlocks {
    let dependents = if target_type == ROLE_TYPE {
        role_dependent_blocks(identifiers)
    } else {
        Vec::new()
    };

    TypeBlocks {
        target_type: target_type.to_string(),
        entries: resource_entries(target_type, identifiers, overrides),
        dependents,
    }
}

/// `IAMRolePolicy` and `IAMRolePolicyAttachment` entries for each role
pub fn role_dependent_blocks<'a, I>(roles: I) -> Vec<DependentBlock>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut policies = Vec::new();
    let mut attachments = Vec::new();
    for role in roles {
        policies.push(FilterEntry::property("role:RoleName", role.as_str()));
        attachments.push(FilterEntry::property("RoleName", role.as_str()));
    }

    vec![
        DependentBlock {
            target_type: ROLE_POLICY_TYPE,
            entries: policies,
        },
        DependentBlock {
            target_type: ROLE_POLICY_ATTACHMENT_TYPE,
            entries: attachments,
        },
    ]
}

/// Double-quoted YAML scalar. A JSON string literal is a valid one.
fn quoted(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Single-line YAML scalar that reads back as the same string. Plain where
/// the YAML emitter allows it; multi-line output falls back to double quotes.
fn scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(yaml) if !yaml.trim_end().contains('\n') => yaml.trim_end().to_string(),
        _ => quoted(value),
    }
}
