use crate::output::{print_json, print_table};
use anyhow::Context;
use baton_core::history::RunRecord;
use std::path::Path;

pub fn run(root: &Path, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let mut records = RunRecord::list(root).context("failed to read run history")?;

    // Records come back oldest first; a limit keeps the most recent ones.
    if let Some(limit) = limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No runs recorded. Run: baton run \"<request>\"");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                short_id(r.id()).to_string(),
                r.report.started_at.format("%Y-%m-%d %H:%M").to_string(),
                r.report.category.to_string(),
                r.report.overall_status.to_string(),
                format!("{:.1}", r.report.overall_score),
                r.request_text.clone(),
            ]
        })
        .collect();

    print_table(
        &["RUN", "STARTED", "CATEGORY", "STATUS", "SCORE", "REQUEST"],
        rows,
    );

    Ok(())
}

fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}
