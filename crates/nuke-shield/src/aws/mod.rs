//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - CloudFormation: stack listing and stack member lookup
//! - Error classification for retry decisions

pub mod context;
pub mod error;
pub mod stacks;

pub use context::AwsContext;
pub use error::{AwsError, classify_aws_error, classify_sdk_error};
pub use stacks::{CloudFormationClient, StackSummaryLite};
