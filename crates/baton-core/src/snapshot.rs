use crate::error::Result;
use crate::history::RunRecord;
use crate::issues::IssueLog;
use crate::paths;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Read-only view of prior project state, built fresh at the start of each
/// run. The classifier keys off `has_prior_docs`: a project is "existing"
/// only once something lives under `.baton/docs/`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    pub has_prior_docs: bool,
    pub prior_run_ids: Vec<String>,
    pub known_issues: BTreeSet<String>,
}

impl ProjectSnapshot {
    pub fn empty() -> Self {
        Self {
            has_prior_docs: false,
            prior_run_ids: Vec::new(),
            known_issues: BTreeSet::new(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let has_prior_docs = dir_contains_file(&paths::docs_dir(root))?;
        let prior_run_ids = RunRecord::ids(root)?;
        let known_issues = IssueLog::load(root)?.open_titles();
        Ok(Self {
            has_prior_docs,
            prior_run_ids,
            known_issues,
        })
    }
}

/// True if any regular file exists anywhere under `dir`. An empty or absent
/// directory counts as no docs.
fn dir_contains_file(dir: &Path) -> std::io::Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_file() {
                return Ok(true);
            }
            if file_type.is_dir() {
                stack.push(entry.path());
            }
        }
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
