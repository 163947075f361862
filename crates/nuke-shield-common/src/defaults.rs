//! Default values and well-known names shared across nuke-shield

/// Regions searched for stacks when none are configured.
///
/// All EU and US regions that are enabled by default in AWS accounts.
pub const DEFAULT_REGIONS: &[&str] = &[
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "eu-central-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

/// Default base config document
pub const DEFAULT_CONFIG_FILE: &str = "example-nuke-config.yml";

/// Suffix appended to the base config path for the generated document
pub const GENERATED_SUFFIX: &str = "-shield-generated";

/// Default aws-nuke executable
pub const DEFAULT_AWS_NUKE_BIN: &str = "aws-nuke";

/// Namespace prefix stripped from CloudFormation resource types
pub const PROVIDER_NAMESPACE: &str = "AWS::";

/// Separator between CloudFormation type segments
pub const TYPE_SEPARATOR: &str = "::";

/// Spaces per nesting level in the config document
pub const INDENT_STEP: usize = 2;

/// Section key holding per-type filters
pub const FILTERS_KEY: &str = "filters";

/// Section key holding per-account settings
pub const ACCOUNTS_KEY: &str = "accounts";

/// Parent section of the type exclusion list
pub const RESOURCE_TYPES_KEY: &str = "resource-types";

/// Type exclusion list under [`RESOURCE_TYPES_KEY`]
pub const EXCLUDES_KEY: &str = "excludes";

/// aws-nuke type that CloudFormation stacks themselves are recorded under
pub const STACK_TARGET_TYPE: &str = "CloudFormationStack";

/// aws-nuke role type, whose policies must be preserved alongside it
pub const ROLE_TYPE: &str = "IAMRole";

/// Inline role policies, filtered by owning role name
pub const ROLE_POLICY_TYPE: &str = "IAMRolePolicy";

/// Managed policy attachments, filtered by owning role name
pub const ROLE_POLICY_ATTACHMENT_TYPE: &str = "IAMRolePolicyAttachment";
