//! Configuration types for a nuke-shield run

use nuke_shield_common::defaults::{DEFAULT_REGIONS, GENERATED_SUFFIX};
use nuke_shield_common::{ManualFilters, MissingSectionPolicy, PropertyOverrides, TagFilter};
use std::path::{Path, PathBuf};

/// Where and what to look for
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Stack name patterns; discovery is skipped when empty
    pub patterns: Vec<String>,
    /// Regions to search, in report order
    pub regions: Vec<String>,
    /// AWS profile name (overrides default credential resolution)
    pub aws_profile: Option<String>,
}

/// Base document and the rules spliced into it
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub base: PathBuf,
    pub output: PathBuf,
    pub tags: Vec<TagFilter>,
    /// aws-nuke types excluded wholesale
    pub excluded_types: Vec<String>,
    pub missing_sections: MissingSectionPolicy,
    pub overrides: PropertyOverrides,
    /// `None` when manual filters are disabled
    pub manual_filters: Option<ManualFilters>,
}

/// aws-nuke invocation
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub aws_nuke_bin: String,
    /// Pass `--no-dry-run`
    pub commit: bool,
    /// Stop after writing the document
    pub generate_only: bool,
    /// Ask the operator about ambiguous mappings
    pub interactive: bool,
}

/// Configuration for a run
///
/// Composed of focused sub-configs, one per phase.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub discovery: DiscoveryConfig,
    pub document: DocumentConfig,
    pub execution: ExecutionConfig,
}

/// `<base>-shield-generated`, next to the base document
pub fn default_output_path(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(GENERATED_SUFFIX);
    PathBuf::from(name)
}

/// Regions from the command line, else the settings file, else the defaults.
/// Blank entries are dropped and duplicates collapsed.
pub fn resolve_regions(cli: &[String], settings: &[String]) -> Vec<String> {
    let chosen: Vec<&str> = if cli.iter().any(|r| !r.trim().is_empty()) {
        cli.iter().map(String::as_str).collect()
    } else if settings.iter().any(|r| !r.trim().is_empty()) {
        settings.iter().map(String::as_str).collect()
    } else {
        DEFAULT_REGIONS.to_vec()
    };

    let mut regions: Vec<String> = Vec::with_capacity(chosen.len());
    for region in chosen.into_iter().map(str::trim).filter(|r| !r.is_empty()) {
        if !regions.iter().any(|r| r == region) {
            regions.push(region.to_string());
        }
    }
    regions
}

/// Trimmed, non-blank list entries
pub fn clean_list(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("example-nuke-config.yml")),
            PathBuf::from("example-nuke-config.yml-shield-generated")
        );
        assert_eq!(
            default_output_path(Path::new("/etc/nuke/base.yml")),
            PathBuf::from("/etc/nuke/base.yml-shield-generated")
        );
    }

    #[test]
    fn test_cli_regions_win() {
        let regions = resolve_regions(
            &strings(&["us-east-1", " eu-west-1", "us-east-1", ""]),
            &strings(&["ap-south-1"]),
        );
        assert_eq!(regions, vec!["us-east-1", "eu-west-1"]);
    }

    #[test]
    fn test_settings_regions_then_defaults() {
        assert_eq!(
            resolve_regions(&[], &strings(&["ap-south-1"])),
            vec!["ap-south-1"]
        );

        let defaults = resolve_regions(&strings(&[" "]), &[]);
        assert_eq!(defaults.len(), DEFAULT_REGIONS.len());
        assert_eq!(defaults[0], "eu-west-1");
        assert_eq!(defaults[8], "us-west-2");
    }

    #[test]
    fn test_clean_list() {
        assert_eq!(
            clean_list(&strings(&[" S3Bucket ", "", "IAMUser"])),
            vec!["S3Bucket", "IAMUser"]
        );
    }
}
