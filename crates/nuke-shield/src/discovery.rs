//! Stack discovery across regions
//!
//! Finds the CloudFormation stacks whose names match any configured
//! pattern and collects their member resources into one [`ResourceGroup`].
//! Regions are queried concurrently and merged back in configured order.

use crate::aws::{AwsContext, CloudFormationClient};
use anyhow::{Context, Result};
use futures::future::try_join_all;
use nuke_shield_common::ResourceGroup;
use nuke_shield_common::defaults::STACK_TARGET_TYPE;
use regex::Regex;
use tracing::{debug, info};

/// Compiled stack-name patterns. A stack is selected when any pattern
/// matches anywhere in its name.
#[derive(Debug, Clone, Default)]
pub struct StackPatterns {
    patterns: Vec<Regex>,
}

impl StackPatterns {
    /// Compile every pattern, failing on the first invalid one
    pub fn compile<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = raw
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).with_context(|| format!("Invalid stack name pattern '{p}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, stack_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(stack_name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Source of stacks and their members.
///
/// Abstracts CloudFormation so discovery can be tested without AWS.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait StackDiscovery: Send + Sync {
    /// Names of live stacks in `region` matching any of `patterns`
    async fn list_matching_stacks(
        &self,
        patterns: &StackPatterns,
        region: &str,
    ) -> Result<Vec<String>>;

    /// Member resources of `stack`, grouped by CloudFormation type
    async fn list_stack_members(&self, stack: &str, region: &str) -> Result<ResourceGroup>;
}

/// [`StackDiscovery`] backed by the CloudFormation API
#[derive(Debug, Clone)]
pub struct CloudFormationDiscovery {
    ctx: AwsContext,
}

impl CloudFormationDiscovery {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }
}

impl StackDiscovery for CloudFormationDiscovery {
    async fn list_matching_stacks(
        &self,
        patterns: &StackPatterns,
        region: &str,
    ) -> Result<Vec<String>> {
        let client = CloudFormationClient::new(&self.ctx, region);
        let stacks = client
            .list_live_stacks()
            .await
            .with_context(|| format!("Failed to list stacks in {region}"))?;

        let matched: Vec<String> = stacks.into_iter().filter(|s| patterns.matches(s)).collect();
        debug!(region, stacks = ?matched, "Matched stacks");
        Ok(matched)
    }

    async fn list_stack_members(&self, stack: &str, region: &str) -> Result<ResourceGroup> {
        CloudFormationClient::new(&self.ctx, region)
            .list_stack_resources(stack)
            .await
            .with_context(|| format!("Failed to list resources of stack '{stack}' in {region}"))
    }
}

/// A stack selected for preservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedStack {
    pub region: String,
    pub name: String,
    /// Member resources with a physical id
    pub resources: usize,
}

/// Everything discovery found, in configured region order
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    pub stacks: Vec<MatchedStack>,
    pub resources: ResourceGroup,
}

struct RegionDiscovery {
    stacks: Vec<MatchedStack>,
    resources: ResourceGroup,
}

/// Discover matching stacks in every region.
///
/// Any failure aborts discovery; a partial resource group would silently
/// leave stacks unprotected.
pub async fn discover<D: StackDiscovery>(
    discovery: &D,
    patterns: &StackPatterns,
    regions: &[String],
) -> Result<DiscoveryOutcome> {
    if patterns.is_empty() {
        debug!("No stack patterns configured, skipping discovery");
        return Ok(DiscoveryOutcome::default());
    }

    let per_region = try_join_all(
        regions
            .iter()
            .map(|region| discover_region(discovery, patterns, region)),
    )
    .await?;

    let mut outcome = DiscoveryOutcome::default();
    for region in per_region {
        outcome.stacks.extend(region.stacks);
        outcome.resources.merge(region.resources);
    }

    info!(
        regions = regions.len(),
        stacks = outcome.stacks.len(),
        resources = outcome.resources.resource_count(),
        "Discovery complete"
    );
    Ok(outcome)
}

async fn discover_region<D: StackDiscovery>(
    discovery: &D,
    patterns: &StackPatterns,
    region: &str,
) -> Result<RegionDiscovery> {
    let stack_names = discovery.list_matching_stacks(patterns, region).await?;

    let mut stacks = Vec::with_capacity(stack_names.len());
    let mut resources = ResourceGroup::new();
    for name in stack_names {
        let members = discovery.list_stack_members(&name, region).await?;
        info!(
            region,
            stack = %name,
            resources = members.resource_count(),
            "Found stack"
        );
        stacks.push(MatchedStack {
            region: region.to_string(),
            name: name.clone(),
            resources: members.resource_count(),
        });
        resources.merge(members);
        resources.insert(STACK_TARGET_TYPE, name);
    }

    Ok(RegionDiscovery { stacks, resources })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    fn group(pairs: &[(&str, &str)]) -> ResourceGroup {
        let mut g = ResourceGroup::new();
        for (t, id) in pairs {
            g.insert(*t, *id);
        }
        g
    }

    #[test]
    fn test_patterns_match_anywhere() {
        let patterns = StackPatterns::compile(["^core-", "network"]).unwrap();
        assert!(patterns.matches("core-vpc"));
        assert!(patterns.matches("shared-network-hub"));
        assert!(!patterns.matches("app-core"));
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let err = StackPatterns::compile(["ok", "(unclosed"]).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[tokio::test]
    async fn test_no_patterns_skips_discovery() {
        let mock = MockStackDiscovery::new();
        let outcome = discover(&mock, &StackPatterns::default(), &regions(&["eu-west-1"]))
            .await
            .unwrap();
        assert!(outcome.stacks.is_empty());
        assert!(outcome.resources.is_empty());
    }

    #[tokio::test]
    async fn test_merges_regions_in_configured_order() {
        let mut mock = MockStackDiscovery::new();
        mock.expect_list_matching_stacks()
            .returning(|_, region| match region {
                "eu-west-1" => Ok(vec!["core".to_string()]),
                "us-east-1" => Ok(vec!["edge".to_string()]),
                _ => Ok(Vec::new()),
            });
        mock.expect_list_stack_members()
            .with(eq("core"), eq("eu-west-1"))
            .times(1)
            .returning(|_, _| Ok(group(&[("AWS::S3::Bucket", "logs"), ("AWS::IAM::Role", "CoreRole")])));
        mock.expect_list_stack_members()
            .with(eq("edge"), eq("us-east-1"))
            .times(1)
            .returning(|_, _| Ok(group(&[("AWS::S3::Bucket", "assets")])));

        let patterns = StackPatterns::compile(["."]).unwrap();
        let outcome = discover(
            &mock,
            &patterns,
            &regions(&["eu-west-1", "eu-west-2", "us-east-1"]),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome.stacks,
            vec![
                MatchedStack {
                    region: "eu-west-1".to_string(),
                    name: "core".to_string(),
                    resources: 2,
                },
                MatchedStack {
                    region: "us-east-1".to_string(),
                    name: "edge".to_string(),
                    resources: 1,
                },
            ]
        );

        let types: Vec<&str> = outcome.resources.iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["AWS::S3::Bucket", "AWS::IAM::Role", STACK_TARGET_TYPE]);

        let buckets: Vec<&str> = outcome
            .resources
            .get("AWS::S3::Bucket")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(buckets, vec!["logs", "assets"]);

        let stacks: Vec<&str> = outcome
            .resources
            .get(STACK_TARGET_TYPE)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(stacks, vec!["core", "edge"]);
    }

    #[tokio::test]
    async fn test_region_failure_aborts_discovery() {
        let mut mock = MockStackDiscovery::new();
        mock.expect_list_matching_stacks()
            .returning(|_, region| match region {
                "eu-west-1" => Ok(Vec::new()),
                _ => Err(anyhow::anyhow!("Access denied in {region}")),
            });

        let patterns = StackPatterns::compile(["core"]).unwrap();
        let err = discover(&mock, &patterns, &regions(&["eu-west-1", "eu-north-1"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("eu-north-1"));
    }
}
