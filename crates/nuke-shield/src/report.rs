//! Operator-facing summaries printed before aws-nuke runs

use crate::discovery::DiscoveryOutcome;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use nuke_shield_common::AssemblyReport;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Cell::new).collect::<Vec<_>>());
    table
}

/// Matched stacks, one row per stack
pub fn stacks_table(outcome: &DiscoveryOutcome) -> Table {
    let mut table = new_table(vec!["Region", "Stack", "Resources"]);
    for stack in &outcome.stacks {
        table.add_row(vec![
            Cell::new(&stack.region),
            Cell::new(&stack.name),
            Cell::new(stack.resources),
        ]);
    }
    table
}

/// Resources to preserve, one row per CloudFormation type
pub fn resources_table(outcome: &DiscoveryOutcome) -> Table {
    let mut table = new_table(vec!["Resource Type", "Count", "Identifiers"]);
    for (resource_type, ids) in outcome.resources.iter() {
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        table.add_row(vec![
            Cell::new(resource_type),
            Cell::new(ids.len()),
            Cell::new(ids.join("\n")),
        ]);
    }
    table
}

/// Source type to aws-nuke type decisions
pub fn mappings_table(report: &AssemblyReport) -> Table {
    let mut table = new_table(vec!["CloudFormation Type", "aws-nuke Type"]);
    for (source, target) in &report.mapped {
        table.add_row(vec![Cell::new(source), Cell::new(target)]);
    }
    table
}

/// Resources left out of the generated document
pub fn unmatched_table(report: &AssemblyReport) -> Table {
    let mut table = new_table(vec!["Resource Type", "Identifiers"]);
    for (resource_type, ids) in report.unmatched.iter() {
        table.add_row(vec![Cell::new(resource_type), Cell::new(ids.join("\n"))]);
    }
    table
}

/// Filter entries not written because their section was missing
pub fn skipped_table(report: &AssemblyReport) -> Table {
    let mut table = new_table(vec!["Stage", "Section", "Entries"]);
    for skipped in &report.skipped {
        table.add_row(vec![
            Cell::new(skipped.stage),
            Cell::new(&skipped.section),
            Cell::new(skipped.entries.len()),
        ]);
    }
    table
}

/// Print what discovery found
pub fn print_discovery_summary(patterns: &[String], regions: &[String], outcome: &DiscoveryOutcome) {
    println!("\n=== Stack Discovery ===\n");
    println!("Patterns: {}", patterns.join(", "));
    println!("Regions:  {}", regions.join(", "));

    if outcome.stacks.is_empty() {
        println!("\nNo stacks matched.");
        return;
    }

    println!("\n{}", stacks_table(outcome));
    println!("\nResources to preserve:\n{}", resources_table(outcome));
}

/// Print mapping decisions and anything that did not make it into the document
pub fn print_assembly_summary(report: &AssemblyReport, output: &str) {
    println!("\n=== Config Generation ===\n");

    if !report.mapped.is_empty() {
        println!("{}", mappings_table(report));
    }

    if !report.unmatched.is_empty() {
        println!(
            "\nThe following resources could not be mapped and have NOT been added to the config:"
        );
        println!("{}", unmatched_table(report));
        println!("\nTheir types may not be supported by aws-nuke, so they will not be deleted either.");
        println!("Run `aws-nuke resource-types` to see the full list of supported types.");
    }

    if !report.skipped.is_empty() {
        println!("\nThe following filters were skipped because their section is missing:");
        println!("{}", skipped_table(report));
    }

    println!(
        "\nWrote {output} ({} lines added).",
        report.inserted_lines
    );
    println!(
        "Review the generated config and the resources aws-nuke marks for deletion before confirming!"
    );
}
