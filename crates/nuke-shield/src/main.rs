//! nuke-shield: generate aws-nuke configs that preserve CloudFormation stacks
//!
//! Finds stacks by name pattern, maps their resources to aws-nuke types,
//! writes the filters into a copy of a base config and runs aws-nuke on it.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use nuke_shield::config::{
    DiscoveryConfig, DocumentConfig, ExecutionConfig, RunConfig, clean_list, default_output_path,
    resolve_regions,
};
use nuke_shield::orchestrator;
use nuke_shield_common::defaults::{DEFAULT_AWS_NUKE_BIN, DEFAULT_CONFIG_FILE};
use nuke_shield_common::tags::parse_tags;
use nuke_shield_common::{MissingSectionPolicy, ShieldSettings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "nuke-shield")]
#[command(about = "Run aws-nuke while preserving selected CloudFormation stacks")]
#[command(version)]
struct Args {
    /// Base aws-nuke config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Comma-separated regexes matched against stack names
    #[arg(long, value_delimiter = ',', action = ArgAction::Append)]
    regexes: Vec<String>,

    /// Comma-separated key:value tags; resources carrying them are preserved
    #[arg(long, value_delimiter = ',', action = ArgAction::Append)]
    tags: Vec<String>,

    /// Comma-separated aws-nuke resource types that are never nuked
    #[arg(long, value_delimiter = ',', action = ArgAction::Append)]
    preserve_resource_types: Vec<String>,

    /// Comma-separated regions to search for stacks
    #[arg(long, value_delimiter = ',', action = ArgAction::Append)]
    regions: Vec<String>,

    /// Run aws-nuke with --no-dry-run. WARNING: resources will actually be deleted
    #[arg(long)]
    no_dry_run: bool,

    /// Generated config path (default: <config>-shield-generated)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON settings file with regions, property overrides and manual filters
    #[arg(long)]
    settings: Option<PathBuf>,

    /// aws-nuke executable
    /// (default: $NUKE_SHIELD_AWS_NUKE, then aws-nuke)
    #[arg(long, env = "NUKE_SHIELD_AWS_NUKE", default_value = DEFAULT_AWS_NUKE_BIN)]
    aws_nuke_bin: String,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    aws_profile: Option<String>,

    /// What to do when a filter section is missing (create, skip)
    #[arg(long, default_value = "create")]
    missing_sections: MissingSectionPolicy,

    /// Decline every ambiguous type mapping instead of prompting
    #[arg(long)]
    non_interactive: bool,

    /// Write the generated config but don't run aws-nuke
    #[arg(long)]
    generate_only: bool,

    /// Leave out the built-in filters for Control Tower and StackSet resources
    #[arg(long)]
    no_manual_filters: bool,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_run_config(self) -> Result<RunConfig> {
        let settings = match &self.settings {
            Some(path) => ShieldSettings::load(path).context("Failed to load settings")?,
            None => ShieldSettings::default(),
        };
        let tags = parse_tags(&self.tags).context("Invalid --tags value")?;
        let output = self
            .output
            .unwrap_or_else(|| default_output_path(&self.config));

        Ok(RunConfig {
            discovery: DiscoveryConfig {
                patterns: clean_list(&self.regexes),
                regions: resolve_regions(&self.regions, &settings.regions),
                aws_profile: self.aws_profile,
            },
            document: DocumentConfig {
                base: self.config,
                output,
                tags,
                excluded_types: clean_list(&self.preserve_resource_types),
                missing_sections: self.missing_sections,
                overrides: settings.property_overrides(),
                manual_filters: (!self.no_manual_filters).then(|| settings.manual_filters()),
            },
            execution: ExecutionConfig {
                aws_nuke_bin: self.aws_nuke_bin,
                commit: self.no_dry_run,
                generate_only: self.generate_only,
                interactive: !self.non_interactive,
            },
        })
    }
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    // Print main error message
    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    // Print error chain (causes)
    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if let Some(suggestion) = e
        .chain()
        .find_map(|c| c.downcast_ref::<nuke_shield::aws::AwsError>())
        .and_then(|aws| aws.suggestion())
    {
        let _ = writeln!(stderr, "  \x1b[36mHint:\x1b[0m {suggestion}");
    }

    // Only print backtrace hint if not already showing
    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // Keep the AWS SDK quiet unless RUST_LOG asks otherwise
    let mut filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    for target in ["aws_config", "aws_sdk_cloudformation", "aws_smithy_runtime"] {
        if let Ok(directive) = format!("{target}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.into_run_config()?;
    info!(
        base = %config.document.base.display(),
        output = %config.document.output.display(),
        patterns = ?config.discovery.patterns,
        regions = ?config.discovery.regions,
        tags = config.document.tags.len(),
        commit = config.execution.commit,
        "Starting nuke-shield run"
    );

    orchestrator::run(config).await
}
