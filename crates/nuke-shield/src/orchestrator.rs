//! Run orchestration
//!
//! Discovery, catalog loading, document assembly, reporting and finally the
//! aws-nuke invocation, in that order. Every step before aws-nuke runs is
//! fatal on error, so aws-nuke never sees a partially generated config.

use crate::aws::AwsContext;
use crate::catalog_source::fetch_catalog;
use crate::config::{DocumentConfig, RunConfig};
use crate::discovery::{CloudFormationDiscovery, DiscoveryOutcome, StackPatterns, discover};
use crate::executor::{exit_code, run_aws_nuke};
use crate::prompt::TerminalPrompt;
use crate::report;
use anyhow::{Context, Result};
use nuke_shield_common::{
    AssemblyReport, AssemblyRequest, DeclineAll, DocumentAssembler, LineDocument, ManualFilters,
    MappingPrompt, ResourceGroup, TargetTypeCatalog,
};
use tracing::info;

/// Splice every configured rule and the discovered resources into `doc`
pub fn assemble_document(
    doc: &mut LineDocument,
    catalog: &TargetTypeCatalog,
    config: &DocumentConfig,
    resources: &ResourceGroup,
    prompt: &mut dyn MappingPrompt,
) -> AssemblyReport {
    let no_manual_filters = ManualFilters::empty();
    let manual_filters = config.manual_filters.as_ref().unwrap_or(&no_manual_filters);

    let assembler = DocumentAssembler::new(catalog, &config.overrides, manual_filters)
        .with_policy(config.missing_sections);
    let request = AssemblyRequest {
        tags: &config.tags,
        excluded_types: &config.excluded_types,
        resources,
        manual_filters: config.manual_filters.is_some(),
    };
    assembler.assemble(doc, &request, prompt)
}

/// Execute a full run, returning the process exit code
pub async fn run(config: RunConfig) -> Result<i32> {
    let patterns = StackPatterns::compile(&config.discovery.patterns)?;

    let mut doc = LineDocument::load(&config.document.base)
        .context("Failed to load base aws-nuke config")?;
    let catalog = fetch_catalog(&config.execution.aws_nuke_bin).await?;

    let outcome = if patterns.is_empty() {
        DiscoveryOutcome::default()
    } else {
        let home_region = config
            .discovery
            .regions
            .first()
            .map(String::as_str)
            .unwrap_or("us-east-1");
        let aws =
            AwsContext::with_profile(home_region, config.discovery.aws_profile.as_deref()).await;
        info!(
            home_region = aws.region(),
            profile = ?config.discovery.aws_profile,
            "Loaded AWS configuration"
        );
        let outcome = discover(
            &CloudFormationDiscovery::new(aws),
            &patterns,
            &config.discovery.regions,
        )
        .await?;
        report::print_discovery_summary(
            &config.discovery.patterns,
            &config.discovery.regions,
            &outcome,
        );
        outcome
    };

    let assembly = if config.execution.interactive && !outcome.resources.is_empty() {
        println!("\n=== Mapping Resource Types ===\n");
        println!(
            "CloudFormation type names differ from aws-nuke's. Each type is mapped to an aws-nuke type; ambiguous ones are listed for you to choose from."
        );
        // The prompt blocks on stdin
        tokio::task::block_in_place(|| {
            let mut prompt = TerminalPrompt::stdio();
            assemble_document(
                &mut doc,
                &catalog,
                &config.document,
                &outcome.resources,
                &mut prompt,
            )
        })
    } else {
        assemble_document(
            &mut doc,
            &catalog,
            &config.document,
            &outcome.resources,
            &mut DeclineAll,
        )
    };

    doc.write(&config.document.output)
        .context("Failed to write generated aws-nuke config")?;
    let output = config.document.output.display().to_string();
    info!(path = %output, lines = doc.len(), "Wrote generated config");
    report::print_assembly_summary(&assembly, &output);

    if config.execution.generate_only {
        return Ok(0);
    }

    println!("\n=== Running aws-nuke ===\n");
    let status = run_aws_nuke(
        &config.execution.aws_nuke_bin,
        &config.document.output,
        config.execution.commit,
    )
    .await?;
    Ok(exit_code(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuke_shield_common::{MissingSectionPolicy, PropertyOverrides, ScriptedPrompt, TagFilter};
    use nuke_shield_test_utils::{BASE_CONFIG, SAMPLE_CATALOG};
    use std::path::PathBuf;

    fn document_config(manual_filters: Option<ManualFilters>) -> DocumentConfig {
        DocumentConfig {
            base: PathBuf::from("base.yml"),
            output: PathBuf::from("base.yml-shield-generated"),
            tags: Vec::new(),
            excluded_types: Vec::new(),
            missing_sections: MissingSectionPolicy::Create,
            overrides: PropertyOverrides::builtin(),
            manual_filters,
        }
    }

    #[test]
    fn test_manual_filters_disabled() {
        let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
        let mut doc = LineDocument::parse(BASE_CONFIG);
        let report = assemble_document(
            &mut doc,
            &catalog,
            &document_config(None),
            &ResourceGroup::new(),
            &mut DeclineAll,
        );
        assert_eq!(report.inserted_lines, 0);
        assert_eq!(doc, LineDocument::parse(BASE_CONFIG));
    }

    #[test]
    fn test_manual_filters_enabled() {
        let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
        let mut doc = LineDocument::parse(BASE_CONFIG);
        let report = assemble_document(
            &mut doc,
            &catalog,
            &document_config(Some(ManualFilters::builtin())),
            &ResourceGroup::new(),
            &mut DeclineAll,
        );
        assert!(report.inserted_lines > 0);
        assert!(doc.locate("IAMSAMLProvider").is_some());
    }

    #[test]
    fn test_operator_choice_is_used() {
        let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
        let mut config = document_config(None);
        config.tags = vec![TagFilter {
            key: "Owner".to_string(),
            value: "platform".to_string(),
        }];

        let mut resources = ResourceGroup::new();
        resources.insert("AWS::APIGateway::API", "abc123");

        let mut doc = LineDocument::parse(BASE_CONFIG);
        let mut prompt = ScriptedPrompt::new(["2"]);
        let report = assemble_document(&mut doc, &catalog, &config, &resources, &mut prompt);

        assert_eq!(
            report.mapped,
            vec![(
                "AWS::APIGateway::API".to_string(),
                "APIGatewayV2API".to_string()
            )]
        );
        let section = doc.locate("APIGatewayV2API").unwrap();
        assert_eq!(doc.line(section + 1).map(str::trim), Some("- \"abc123\""));
    }
}
