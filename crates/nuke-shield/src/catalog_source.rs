//! aws-nuke resource type catalog source
//!
//! The catalog is read once per run from `aws-nuke resource-types`.

use anyhow::{Context, Result, bail};
use nuke_shield_common::TargetTypeCatalog;
use tokio::process::Command;
use tracing::{debug, info};

/// Subcommand that prints every supported resource type
const RESOURCE_TYPES_ARG: &str = "resource-types";

/// Run `<bin> resource-types` and parse its output.
///
/// Spawn failures, non-zero exits and an empty listing are all fatal, since
/// no filter could be mapped without a catalog.
pub async fn fetch_catalog(bin: &str) -> Result<TargetTypeCatalog> {
    debug!(bin, "Fetching aws-nuke resource types");

    let output = Command::new(bin)
        .arg(RESOURCE_TYPES_ARG)
        .output()
        .await
        .with_context(|| format!("Failed to run '{bin} {RESOURCE_TYPES_ARG}'"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "'{bin} {RESOURCE_TYPES_ARG}' exited with {}: {}",
            output.status,
            stderr.trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let catalog = TargetTypeCatalog::parse(&stdout);
    if catalog.is_empty() {
        bail!("'{bin} {RESOURCE_TYPES_ARG}' listed no resource types");
    }

    info!(types = catalog.len(), "Loaded aws-nuke resource types");
    Ok(catalog)
}
