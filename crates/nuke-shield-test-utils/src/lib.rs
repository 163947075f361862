//! Shared test utilities for nuke-shield
//!
//! This crate provides fixtures and helpers used by the tests of both the
//! engine crate and the binary crate.
//!
//! ## Modules
//!
//! - [`aws`]: AWS region detection for live discovery tests
//! - [`fixtures`]: Sample config documents and resource type catalogs

pub mod aws;
pub mod fixtures;

// Re-export commonly used items
pub use aws::{get_test_region, live_aws_enabled};
pub use fixtures::{BASE_CONFIG, MINIMAL_CONFIG, ROLE_CONFIG, SAMPLE_CATALOG};
