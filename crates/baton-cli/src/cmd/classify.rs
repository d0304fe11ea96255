use crate::output::print_json;
use anyhow::Context;
use baton_core::{
    classifier::Classifier,
    config::Config,
    request::{Request, Vocabulary},
    snapshot::ProjectSnapshot,
};
use std::path::Path;

/// Classify a request without running anything. Works on uninitialized
/// projects too, falling back to the built-in vocabulary.
pub fn run(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let snapshot = ProjectSnapshot::load(root).context("failed to snapshot project")?;

    let vocabulary = Vocabulary::with_extensions(&config.keywords);
    let request = Request::from_text(text, &vocabulary);
    let category = Classifier::new(vocabulary).classify(&request, &snapshot);

    if json {
        return print_json(&serde_json::json!({
            "text": request.raw_text,
            "category": category,
            "keywords": request.detected_keywords,
        }));
    }

    println!("Category: {category}");
    if request.detected_keywords.is_empty() {
        println!("Keywords: (none)");
    } else {
        let keywords: Vec<&str> = request
            .detected_keywords
            .iter()
            .map(|k| k.as_str())
            .collect();
        println!("Keywords: {}", keywords.join(", "));
    }
    if !snapshot.has_prior_docs {
        println!("Note: no prior docs found, so every request starts a new project");
    }

    Ok(())
}
