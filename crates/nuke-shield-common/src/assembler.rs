//! Staged editing of the aws-nuke config document
//!
//! Four stages run in a fixed order, each splicing lines into the document:
//!
//! 1. Tag filters for every catalog type
//! 2. The `resource-types` / `excludes` list
//! 3. Per-resource filters for every discovered resource group
//! 4. Manual filters for operator-managed resources
//!
//! Later stages rely on sections created by earlier ones (the `filters`
//! section in particular), and re-running the assembler on its own output
//! reuses existing section headers instead of duplicating them.
//!
//! Rules go into the `filters` section of the first account under
//! `accounts`. Spliced lines take the indentation of the section's existing
//! children, so compact sequences (`key:` / `- item` at the same depth) stay
//! valid YAML.

use crate::catalog::TargetTypeCatalog;
use crate::defaults::{ACCOUNTS_KEY, EXCLUDES_KEY, FILTERS_KEY, INDENT_STEP, RESOURCE_TYPES_KEY};
use crate::document::LineDocument;
use crate::filters::{self, FilterEntry};
use crate::manual_filters::ManualFilters;
use crate::mapper::{Mapping, MappingPrompt, TypeMapper};
use crate::overrides::PropertyOverrides;
use crate::resource_group::{ResourceGroup, UnmatchedResources};
use crate::tags::TagFilter;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// What to do when a filter section for a mapped type does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSectionPolicy {
    /// Create the section under `filters`
    #[default]
    Create,
    /// Leave the document alone and record the skipped entries
    Skip,
}

impl FromStr for MissingSectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(MissingSectionPolicy::Create),
            "skip" => Ok(MissingSectionPolicy::Skip),
            other => Err(format!("expected 'create' or 'skip', got '{other}'")),
        }
    }
}

impl fmt::Display for MissingSectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSectionPolicy::Create => f.write_str("create"),
            MissingSectionPolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Assembly stage, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tags,
    ResourceTypes,
    Resources,
    ManualFilters,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Tags => "tags",
            Stage::ResourceTypes => "resource-types",
            Stage::Resources => "resources",
            Stage::ManualFilters => "manual-filters",
        };
        f.write_str(name)
    }
}

/// Entries that were not written because their section was missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInsertion {
    pub stage: Stage,
    pub section: String,
    pub entries: Vec<FilterEntry>,
}

/// Outcome of an assembly run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// `(source type, aws-nuke type)` for every mapped resource group
    pub mapped: Vec<(String, String)>,
    pub unmatched: UnmatchedResources,
    pub skipped: Vec<SkippedInsertion>,
    /// Section headers created because they were missing
    pub created_sections: Vec<String>,
    pub inserted_lines: usize,
}

impl AssemblyReport {
    /// Nothing was left out of the document
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty() && self.skipped.is_empty()
    }
}

/// Inputs for a full assembly run
#[derive(Debug, Clone, Copy)]
pub struct AssemblyRequest<'a> {
    pub tags: &'a [TagFilter],
    pub excluded_types: &'a [String],
    pub resources: &'a ResourceGroup,
    /// Run the manual filter stage
    pub manual_filters: bool,
}

/// Edits a config document in place
#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler<'a> {
    catalog: &'a TargetTypeCatalog,
    overrides: &'a PropertyOverrides,
    manual_filters: &'a ManualFilters,
    policy: MissingSectionPolicy,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        catalog: &'a TargetTypeCatalog,
        overrides: &'a PropertyOverrides,
        manual_filters: &'a ManualFilters,
    ) -> Self {
        Self {
            catalog,
            overrides,
            manual_filters,
            policy: MissingSectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MissingSectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every stage in order
    pub fn assemble(
        &self,
        doc: &mut LineDocument,
        request: &AssemblyRequest<'_>,
        prompt: &mut dyn MappingPrompt,
    ) -> AssemblyReport {
        let mut report = AssemblyReport::default();

        self.add_tag_filters(doc, request.tags, &mut report);
        self.add_type_exclusions(doc, request.excluded_types, &mut report);
        self.add_resource_filters(doc, request.resources, prompt, &mut report);
        if request.manual_filters {
            self.add_manual_filters(doc, &mut report);
        }

        info!(
            inserted_lines = report.inserted_lines,
            mapped = report.mapped.len(),
            unmatched = report.unmatched.len(),
            skipped = report.skipped.len(),
            "Config document assembled"
        );
        report
    }

    /// Stage 1: a `tag:<key>` filter per tag under every catalog type.
    ///
    /// Types that already have a section get the entries spliced in; the
    /// rest get new sections, in catalog order, at the top of `filters`.
    pub fn add_tag_filters(
        &self,
        doc: &mut LineDocument,
        tags: &[TagFilter],
        report: &mut AssemblyReport,
    ) {
        if tags.is_empty() {
            return;
        }
        let entries = filters::tag_entries(tags);

        let mut missing = Vec::new();
        for type_name in self.catalog.iter() {
            match find_type_section(doc, type_name) {
                Some(section) => {
                    report.inserted_lines += insert_entries(doc, section, &entries);
                }
                None => missing.push(type_name),
            }
        }

        if !missing.is_empty() {
            let filters_at = ensure_filters_section(doc, report);
            let indent = entry_indent(doc, filters_at);
            let lines: Vec<String> = missing
                .iter()
                .flat_map(|t| filters::render_section(t, &entries, indent))
                .collect();
            report.inserted_lines += splice_under(doc, filters_at, lines);
            report
                .created_sections
                .extend(missing.iter().map(|t| t.to_string()));
        }

        debug!(
            tags = tags.len(),
            types = self.catalog.len(),
            created = missing.len(),
            "Added tag filters"
        );
    }

    /// Stage 2: types aws-nuke must not touch at all
    pub fn add_type_exclusions(
        &self,
        doc: &mut LineDocument,
        excluded_types: &[String],
        report: &mut AssemblyReport,
    ) {
        let items: Vec<&str> = excluded_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if items.is_empty() {
            return;
        }

        if let Some(excludes) = doc.locate_path(&[RESOURCE_TYPES_KEY, EXCLUDES_KEY]) {
            let lines = filters::render_list(&items, entry_indent(doc, excludes));
            report.inserted_lines += splice_under(doc, excludes, lines);
        } else if let Some(parent) = doc.locate_path(&[RESOURCE_TYPES_KEY]) {
            let indent = entry_indent(doc, parent);
            let mut lines = vec![format!("{}{EXCLUDES_KEY}:", " ".repeat(indent))];
            lines.extend(filters::render_list(&items, indent + INDENT_STEP));
            report.inserted_lines += splice_under(doc, parent, lines);
            report.created_sections.push(EXCLUDES_KEY.to_string());
        } else {
            let mut lines = vec![
                format!("{RESOURCE_TYPES_KEY}:"),
                format!("{}{EXCLUDES_KEY}:", " ".repeat(INDENT_STEP)),
            ];
            lines.extend(filters::render_list(&items, 2 * INDENT_STEP));
            report.inserted_lines += doc.append(lines);
            report
                .created_sections
                .extend([RESOURCE_TYPES_KEY.to_string(), EXCLUDES_KEY.to_string()]);
        }

        debug!(types = ?items, "Added resource type exclusions");
    }

    /// Stage 3: map every resource group and write its filters
    pub fn add_resource_filters(
        &self,
        doc: &mut LineDocument,
        resources: &ResourceGroup,
        prompt: &mut dyn MappingPrompt,
        report: &mut AssemblyReport,
    ) {
        let mut mapper = TypeMapper::new(self.catalog, prompt);

        for (source_type, ids) in resources.iter() {
            let mapping = mapper.map(source_type);
            let Some(target) = mapping.target() else {
                report.unmatched.record(source_type, ids);
                continue;
            };

            let blocks = filters::build_blocks(target, ids, self.overrides);
            self.insert_block(doc, Stage::Resources, target, blocks.entries, report);
            for dependent in blocks.dependents {
                self.insert_block(
                    doc,
                    Stage::Resources,
                    dependent.target_type,
                    dependent.entries,
                    report,
                );
            }

            if let Mapping::Exact(t) | Mapping::Chosen(t) = mapping {
                report.mapped.push((source_type.to_string(), t));
            }
        }
    }

    /// Stage 4: fixed rules for operator-managed resources
    pub fn add_manual_filters(&self, doc: &mut LineDocument, report: &mut AssemblyReport) {
        for (type_name, entries) in self.manual_filters.iter() {
            self.insert_block(doc, Stage::ManualFilters, type_name, entries.to_vec(), report);
        }
    }

    /// Splice `entries` under the section for `type_name`, creating it or
    /// recording a skip when it is missing
    fn insert_block(
        &self,
        doc: &mut LineDocument,
        stage: Stage,
        type_name: &str,
        entries: Vec<FilterEntry>,
        report: &mut AssemblyReport,
    ) {
        if entries.is_empty() {
            return;
        }

        if let Some(section) = find_type_section(doc, type_name) {
            report.inserted_lines += insert_entries(doc, section, &entries);
            return;
        }

        match self.policy {
            MissingSectionPolicy::Create => {
                let filters_at = ensure_filters_section(doc, report);
                let indent = entry_indent(doc, filters_at);
                let lines = filters::render_section(type_name, &entries, indent);
                report.inserted_lines += splice_under(doc, filters_at, lines);
                report.created_sections.push(type_name.to_string());
                debug!(%stage, section = type_name, "Created filter section");
            }
            MissingSectionPolicy::Skip => {
                warn!(
                    %stage,
                    section = type_name,
                    entries = entries.len(),
                    "Filter section not found, skipping"
                );
                report.skipped.push(SkippedInsertion {
                    stage,
                    section: type_name.to_string(),
                    entries,
                });
            }
        }
    }
}

/// Header of the first account entry under `accounts`
fn first_account(doc: &LineDocument) -> Option<usize> {
    doc.locate_path(&[ACCOUNTS_KEY])
        .and_then(|accounts| doc.first_child_section(accounts))
}

/// The `filters` section rules go into: the first account's, or the first
/// `filters:` anywhere when the document has no accounts. Filters under
/// `presets` only apply to accounts that reference the preset.
fn filters_anchor(doc: &LineDocument) -> Option<usize> {
    match first_account(doc) {
        Some(account) => doc.locate_child(account, FILTERS_KEY),
        None => doc.locate(FILTERS_KEY),
    }
}

/// Header line of the section for `type_name`.
///
/// Prefers a direct child of the filters anchor, then any header of that
/// name inside the first account (or anywhere, without accounts).
fn find_type_section(doc: &LineDocument, type_name: &str) -> Option<usize> {
    if let Some(section) =
        filters_anchor(doc).and_then(|filters_at| doc.locate_child(filters_at, type_name))
    {
        return Some(section);
    }
    match first_account(doc) {
        Some(account) => doc.locate_descendant(account, type_name),
        None => doc.locate(type_name),
    }
}

/// Index of the filters anchor, creating it if absent.
///
/// A new section goes at the end of the first account under `accounts`, or
/// at the end of the document when there are no accounts.
fn ensure_filters_section(doc: &mut LineDocument, report: &mut AssemblyReport) -> usize {
    if let Some(index) = filters_anchor(doc) {
        return index;
    }

    let index = match first_account(doc) {
        Some(account) => {
            doc.open_section(account);
            let header = format!("{}{FILTERS_KEY}:", " ".repeat(entry_indent(doc, account)));
            let end = doc.section_end(account);
            doc.insert_after(end - 1, vec![header]);
            end
        }
        None => {
            doc.append(vec![format!("{FILTERS_KEY}:")]);
            doc.len() - 1
        }
    };

    report.inserted_lines += 1;
    report.created_sections.push(FILTERS_KEY.to_string());
    info!(line = index + 1, "Created filters section");
    index
}

/// Column for lines spliced directly under the header at `section`: that of
/// its existing children, else one step deeper than the header
fn entry_indent(doc: &LineDocument, section: usize) -> usize {
    doc.child_indent(section)
        .unwrap_or_else(|| doc.indent_of(section) + INDENT_STEP)
}

/// Splice `lines` directly after the header at `section`, opening an inline
/// empty header first
fn splice_under(doc: &mut LineDocument, section: usize, lines: Vec<String>) -> usize {
    if doc.open_section(section) {
        debug!(line = section + 1, "Opened inline empty section");
    }
    doc.insert_after(section, lines)
}

/// Splice rendered entries directly after the section header
fn insert_entries(doc: &mut LineDocument, section: usize, entries: &[FilterEntry]) -> usize {
    let lines = filters::render_entries(entries, entry_indent(doc, section));
    splice_under(doc, section, lines)
}
