//! aws-nuke invocation
//!
//! Runs aws-nuke against the generated document with the terminal attached,
//! so its own confirmation prompts reach the operator.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{info, warn};

/// Arguments for `aws-nuke`: `-c <config> [--no-dry-run]`
pub fn nuke_args(config: &Path, commit: bool) -> Vec<String> {
    let mut args = vec!["-c".to_string(), config.display().to_string()];
    if commit {
        args.push("--no-dry-run".to_string());
    }
    args
}

/// Run aws-nuke and wait for it to exit
pub async fn run_aws_nuke(bin: &str, config: &Path, commit: bool) -> Result<ExitStatus> {
    let args = nuke_args(config, commit);
    if commit {
        warn!(bin, args = ?args, "Running aws-nuke with --no-dry-run, resources WILL be deleted");
    } else {
        info!(bin, args = ?args, "Running aws-nuke in dry-run mode");
    }

    let status = Command::new(bin)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to spawn command: {bin}"))?;

    info!(bin, %status, "aws-nuke finished");
    Ok(status)
}

/// Process exit code for a finished child. Signals map to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
