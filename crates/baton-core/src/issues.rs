use crate::error::{BatonError, Result};
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// IssueLog
// ---------------------------------------------------------------------------

/// The project's known-issues log, persisted at `.baton/issues.yaml`.
/// Titles are unique among open issues; resolving keeps the entry for the
/// record and frees the title for reuse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueLog {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl IssueLog {
    /// An absent issues file is an empty log, not an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::issues_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let log: IssueLog = serde_yaml::from_str(&data)?;
        Ok(log)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::issues_path(root);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    pub fn add(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if self.issues.iter().any(|i| !i.resolved && i.title == title) {
            return Err(BatonError::IssueExists(title));
        }
        self.issues.push(Issue {
            title,
            opened_at: Utc::now(),
            resolved: false,
            resolved_at: None,
        });
        Ok(())
    }

    pub fn resolve(&mut self, title: &str) -> Result<()> {
        let issue = self
            .issues
            .iter_mut()
            .find(|i| !i.resolved && i.title == title)
            .ok_or_else(|| BatonError::IssueNotFound(title.to_string()))?;
        issue.resolved = true;
        issue.resolved_at = Some(Utc::now());
        Ok(())
    }

    pub fn open_titles(&self) -> BTreeSet<String> {
        self.issues
            .iter()
            .filter(|i| !i.resolved)
            .map(|i| i.title.clone())
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.issues.iter().filter(|i| !i.resolved).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
