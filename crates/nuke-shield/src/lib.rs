//! nuke-shield - Protect CloudFormation stacks from aws-nuke
//!
//! This crate provides the `nuke-shield` binary: it discovers the stacks to
//! keep, writes an aws-nuke config whose filters spare their resources, and
//! hands that config to aws-nuke.

pub mod aws;
pub mod catalog_source;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod orchestrator;
pub mod prompt;
pub mod report;
