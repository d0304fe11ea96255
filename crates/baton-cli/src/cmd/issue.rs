use crate::output::{print_json, print_table};
use anyhow::Context;
use baton_core::issues::IssueLog;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum IssueSubcommand {
    /// Record a known issue
    Add { title: String },
    /// List known issues
    List {
        /// Include resolved issues
        #[arg(long)]
        all: bool,
    },
    /// Mark an open issue as resolved
    Resolve { title: String },
}

pub fn run(root: &Path, subcmd: IssueSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IssueSubcommand::Add { title } => add(root, &title, json),
        IssueSubcommand::List { all } => list(root, all, json),
        IssueSubcommand::Resolve { title } => resolve(root, &title, json),
    }
}

fn add(root: &Path, title: &str, json: bool) -> anyhow::Result<()> {
    let mut log = IssueLog::load(root).context("failed to load issues")?;
    log.add(title)?;
    log.save(root).context("failed to save issues")?;

    if json {
        print_json(&serde_json::json!({
            "title": title,
            "open": log.open_count(),
        }))?;
    } else {
        println!("Recorded issue: {title}");
    }
    Ok(())
}

fn list(root: &Path, all: bool, json: bool) -> anyhow::Result<()> {
    let log = IssueLog::load(root).context("failed to load issues")?;
    let issues: Vec<_> = log
        .issues
        .iter()
        .filter(|i| all || !i.resolved)
        .collect();

    if json {
        return print_json(&issues);
    }

    if issues.is_empty() {
        if all {
            println!("No issues recorded.");
        } else {
            println!("No open issues.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = issues
        .iter()
        .map(|i| {
            vec![
                if i.resolved { "resolved" } else { "open" }.to_string(),
                i.opened_at.format("%Y-%m-%d").to_string(),
                i.title.clone(),
            ]
        })
        .collect();
    print_table(&["STATUS", "OPENED", "TITLE"], rows);
    Ok(())
}

fn resolve(root: &Path, title: &str, json: bool) -> anyhow::Result<()> {
    let mut log = IssueLog::load(root).context("failed to load issues")?;
    log.resolve(title)?;
    log.save(root).context("failed to save issues")?;

    if json {
        print_json(&serde_json::json!({
            "title": title,
            "resolved": true,
        }))?;
    } else {
        println!("Resolved issue: {title}");
    }
    Ok(())
}
