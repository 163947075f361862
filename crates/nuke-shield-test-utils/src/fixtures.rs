//! Sample aws-nuke config documents and catalogs

/// Base config with an account, a filters section and a type exclusion list
pub const BASE_CONFIG: &str = r#"regions:
  - global
  - eu-west-1

blocklist:
  - "999999999999"

# Resources listed here are never touched
resource-types:
  excludes:
    - IAMUser

accounts:
  "123456789012":
    filters:
      S3Bucket:
        - "audit-logs"
      IAMRole:
        - "OrganizationAccountAccessRole"
"#;

/// Config without any filters or type exclusions
pub const MINIMAL_CONFIG: &str = r#"regions:
  - eu-west-1

accounts:
  "123456789012":
    presets: []
"#;

/// Config where `IAMRole` sits directly above a nested `filters` key
pub const ROLE_CONFIG: &str = r#"accounts:
  "123456789012":
    IAMRole:
      filters:
"#;

/// Excerpt of `aws-nuke resource-types` output
pub const SAMPLE_CATALOG: &str = "\
APIGatewayRestAPI
APIGatewayV2API
CloudFormationStack
CloudWatchEventsRule
CloudWatchEventsTarget
EC2Instance
EC2SecurityGroup
EC2VPC
IAMRole
IAMRolePolicy
IAMRolePolicyAttachment
IAMSAMLProvider
IAMUser
LambdaFunction
S3Bucket
SNSSubscription
SNSTopic
SQSQueue
";
