use anyhow::Context;
use baton_core::{config::Config, io, issues::IssueLog, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing baton in: {}", root.display());

    // 1. Create the .baton directory structure
    let dirs = [paths::BATON_DIR, paths::DOCS_DIR, paths::RUNS_DIR];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. Write config.yaml if missing — never clobber an edited config
    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let cfg = Config::scaffold(&project_name);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    // 3. Write an empty issues log if missing
    let issues_yaml = serde_yaml::to_string(&IssueLog::default())?;
    if io::write_if_missing(&paths::issues_path(root), issues_yaml.as_bytes())? {
        println!("  created: {}", paths::ISSUES_FILE);
    } else {
        println!("  exists:  {}", paths::ISSUES_FILE);
    }

    println!("\nbaton initialized.");
    println!("Next: baton run \"<what you want done>\"");

    Ok(())
}
