use crate::output::print_json;
use anyhow::Context;
use baton_core::snapshot::ProjectSnapshot;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let snapshot = ProjectSnapshot::load(root).context("failed to snapshot project")?;

    if json {
        return print_json(&snapshot);
    }

    println!("Root: {}", root.display());
    println!(
        "Docs: {}",
        if snapshot.has_prior_docs { "yes" } else { "none" }
    );
    println!("Runs: {}", snapshot.prior_run_ids.len());

    if snapshot.known_issues.is_empty() {
        println!("Open issues: 0");
    } else {
        println!("Open issues: {}", snapshot.known_issues.len());
        for title in &snapshot.known_issues {
            println!("  - {title}");
        }
    }

    Ok(())
}
