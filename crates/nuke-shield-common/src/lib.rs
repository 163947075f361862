//! nuke-shield-common - Resource-type mapping and config-document editing
//!
//! This crate holds the engine that turns discovered CloudFormation resources
//! into aws-nuke filter rules, without any AWS SDK dependencies so it can be
//! tested in isolation.
//!
//! ## Modules
//!
//! - [`document`]: Line buffer and section locator for aws-nuke configs
//! - [`catalog`]: aws-nuke resource type catalog
//! - [`mapper`]: CloudFormation to aws-nuke type mapping with operator prompts
//! - [`overrides`]: Per-type property overrides for filter entries
//! - [`filters`]: Filter entries and block builders
//! - [`manual_filters`]: Fixed preservation rules for operator-managed resources
//! - [`assembler`]: Staged editing of the config document
//! - [`resource_group`]: Discovered and unmatched resources grouped by type
//! - [`settings`]: Optional JSON settings file
//! - [`tags`]: `key:value` tag parsing

pub mod assembler;
pub mod catalog;
pub mod defaults;
pub mod document;
pub mod error;
pub mod filters;
pub mod manual_filters;
pub mod mapper;
pub mod overrides;
pub mod resource_group;
pub mod settings;
pub mod tags;

// Re-export commonly used types
pub use assembler::{
    AssemblyReport, AssemblyRequest, DocumentAssembler, MissingSectionPolicy, SkippedInsertion,
    Stage,
};
pub use catalog::TargetTypeCatalog;
pub use document::LineDocument;
pub use error::{ConfigError, DocumentError, TagError};
pub use filters::{FilterEntry, MatchType, PropertyMatch};
pub use manual_filters::ManualFilters;
pub use mapper::{DeclineAll, Mapping, MappingPrompt, MatchOutcome, ScriptedPrompt, TypeMapper};
pub use overrides::{PropertyOverride, PropertyOverrides};
pub use resource_group::{ResourceGroup, UnmatchedResources};
pub use settings::ShieldSettings;
pub use tags::TagFilter;
