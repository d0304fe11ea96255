use crate::output::print_json;
use anyhow::Context;
use baton_core::{
    config::{Config, HandlerSpec},
    engine::Engine,
    handler::{HandlerRegistry, NoopHandler},
    history::RunRecord,
    shell::ShellHandler,
    types::{RunStatus, StageId},
};
use std::path::Path;
use std::sync::Arc;

pub fn run(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let registry = build_registry(&config, root);
    let engine = Engine::new(&config, registry);

    let report = engine.run(root, text)?;
    RunRecord::new(text, report.clone())
        .save(root)
        .context("failed to record run")?;

    if json {
        print_json(&report)?;
    } else {
        println!("Run:      {}", report.run_id);
        println!("Category: {}", report.category);
        println!("Plan:     {}", report.plan);
        println!();
        for result in &report.results {
            let score = result.score.map(|s| format!(" ({s})")).unwrap_or_default();
            println!(
                "  {:9} {:7}{} {}",
                result.stage.as_str(),
                result.status.to_string(),
                score,
                result.summary
            );
        }
        println!();
        println!(
            "Overall: {} (score {:.1})",
            report.overall_status, report.overall_score
        );
    }

    if report.overall_status == RunStatus::Failed {
        anyhow::bail!("run failed");
    }
    Ok(())
}

/// Build the handler registry from the config's handler table. Stages without
/// an entry stay unregistered; the executor skips optional ones and refuses
/// plans that need a mandatory one.
fn build_registry(config: &Config, root: &Path) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for &stage in StageId::all() {
        match config.handler_for(stage) {
            Some(HandlerSpec::Shell { command }) => {
                registry.register(stage, Arc::new(ShellHandler::new(command.clone(), root)));
            }
            Some(HandlerSpec::Noop) => {
                registry.register(stage, Arc::new(NoopHandler));
            }
            None => {}
        }
    }
    registry
}
