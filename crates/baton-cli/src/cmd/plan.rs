use crate::output::print_json;
use anyhow::Context;
use baton_core::{
    classifier::Classifier,
    config::Config,
    planner::plan_for,
    request::{Request, Vocabulary},
    snapshot::ProjectSnapshot,
};
use std::path::Path;

/// Show the stage plan a request would get, without executing it.
pub fn run(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let snapshot = ProjectSnapshot::load(root).context("failed to snapshot project")?;

    let vocabulary = Vocabulary::with_extensions(&config.keywords);
    let request = Request::from_text(text, &vocabulary);
    let classifier = Classifier::new(vocabulary);
    let category = classifier.classify(&request, &snapshot);
    let plan = plan_for(category, &request.detected_keywords, classifier.vocabulary());

    if json {
        return print_json(&serde_json::json!({
            "category": category,
            "stages": plan.stages(),
        }));
    }

    println!("Category: {category}");
    println!("Plan:     {plan}");

    Ok(())
}
