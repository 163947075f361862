//! AWS test utilities
//!
//! Provides region detection and an opt-in switch for tests that talk to a
//! real account.

/// Get the AWS region for tests.
///
/// Checks environment variables in order:
/// 1. AWS_REGION
/// 2. AWS_DEFAULT_REGION
/// 3. Falls back to eu-west-1
///
/// # Example
///
/// ```
/// use nuke_shield_test_utils::aws::get_test_region;
///
/// let region = get_test_region();
/// assert!(!region.is_empty());
/// ```
pub fn get_test_region() -> String {
    std::env::var("AWS_REGION")
        .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|_| "eu-west-1".to_string())
}

/// Whether live AWS tests were requested with `NUKE_SHIELD_LIVE_AWS=1`
pub fn live_aws_enabled() -> bool {
    std::env::var("NUKE_SHIELD_LIVE_AWS").is_ok_and(|v| v == "1")
}
