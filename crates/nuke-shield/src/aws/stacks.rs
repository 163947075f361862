//! CloudFormation stack operations
//!
//! Lists the live stacks of one region and the physical resources that
//! belong to a stack. Both calls page through the full result set and retry
//! on throttling.

use super::context::AwsContext;
use super::error::{AwsError, classify_sdk_error};
use aws_sdk_cloudformation::types::StackStatus;
use backon::{ExponentialBuilder, Retryable};
use nuke_shield_common::ResourceGroup;
use std::time::Duration;
use tracing::{debug, warn};

/// Name and status of a listed stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummaryLite {
    pub name: String,
    pub deleted: bool,
}

/// CloudFormation client bound to a single region
#[derive(Debug, Clone)]
pub struct CloudFormationClient {
    client: aws_sdk_cloudformation::Client,
    region: String,
}

fn retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(20))
        .with_max_times(5)
}

impl CloudFormationClient {
    pub fn new(ctx: &AwsContext, region: &str) -> Self {
        Self {
            client: ctx.cloudformation_client(region),
            region: region.to_string(),
        }
    }

    /// Names of every stack in the region that has not been deleted
    pub async fn list_live_stacks(&self) -> Result<Vec<String>, AwsError> {
        let summaries = (|| self.list_stacks_once())
            .retry(retry_policy())
            .when(AwsError::is_retryable)
            .notify(|e, dur| {
                warn!(
                    region = %self.region,
                    delay = ?dur,
                    error = %e,
                    "Listing stacks failed, retrying..."
                );
            })
            .await?;

        Ok(live_stack_names(summaries))
    }

    /// Physical resources of `stack`, grouped by CloudFormation type
    pub async fn list_stack_resources(&self, stack: &str) -> Result<ResourceGroup, AwsError> {
        let members = (|| self.list_stack_resources_once(stack))
            .retry(retry_policy())
            .when(AwsError::is_retryable)
            .notify(|e, dur| {
                warn!(
                    region = %self.region,
                    stack,
                    delay = ?dur,
                    error = %e,
                    "Listing stack resources failed, retrying..."
                );
            })
            .await?;

        Ok(group_members(
            stack,
            members
                .iter()
                .map(|(resource_type, id)| (resource_type.as_str(), id.as_deref())),
        ))
    }

    async fn list_stacks_once(&self) -> Result<Vec<StackSummaryLite>, AwsError> {
        let mut summaries = Vec::new();
        let mut pages = self.client.list_stacks().into_paginator().send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            for summary in page.stack_summaries() {
                // Accessors are optional in some SDK releases and required in others
                let name: Option<&str> = summary.stack_name().into();
                let status: Option<&StackStatus> = summary.stack_status().into();
                let Some(name) = name else {
                    continue;
                };
                summaries.push(StackSummaryLite {
                    name: name.to_string(),
                    deleted: status == Some(&StackStatus::DeleteComplete),
                });
            }
        }

        debug!(region = %self.region, count = summaries.len(), "Listed stacks");
        Ok(summaries)
    }

    async fn list_stack_resources_once(
        &self,
        stack: &str,
    ) -> Result<Vec<(String, Option<String>)>, AwsError> {
        let mut members = Vec::new();
        let mut pages = self
            .client
            .list_stack_resources()
            .stack_name(stack)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            for summary in page.stack_resource_summaries() {
                let resource_type: Option<&str> = summary.resource_type().into();
                let Some(resource_type) = resource_type else {
                    continue;
                };
                members.push((
                    resource_type.to_string(),
                    summary.physical_resource_id().map(str::to_string),
                ));
            }
        }

        debug!(region = %self.region, stack, count = members.len(), "Listed stack resources");
        Ok(members)
    }
}

/// Drop deleted stacks, keeping listing order
pub fn live_stack_names(summaries: Vec<StackSummaryLite>) -> Vec<String> {
    summaries
        .into_iter()
        .filter(|s| !s.deleted)
        .map(|s| s.name)
        .collect()
}

/// Group `(type, physical id)` pairs, warning about members without an id
pub fn group_members<'a, I>(stack: &str, members: I) -> ResourceGroup
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut group = ResourceGroup::new();
    for (resource_type, id) in members {
        match id {
            Some(id) if !id.is_empty() => {
                group.insert(resource_type, id);
            }
            _ => warn!(
                stack,
                resource_type,
                "Stack member has no physical resource ID and won't be preserved"
            ),
        }
    }
    group
}
