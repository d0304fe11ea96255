use crate::error::{BatonError, Result};
use crate::io;
use crate::paths;
use crate::report::WorkflowReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One persisted workflow run: the request as typed plus the full report.
/// Records live under `.baton/runs/<run_id>.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub request_text: String,
    pub report: WorkflowReport,
}

impl RunRecord {
    pub fn new(request_text: impl Into<String>, report: WorkflowReport) -> Self {
        Self {
            request_text: request_text.into(),
            report,
        }
    }

    pub fn id(&self) -> &str {
        &self.report.run_id
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::run_path(root, self.id());
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    pub fn load(root: &Path, run_id: &str) -> Result<Self> {
        let path = paths::run_path(root, run_id);
        if !path.exists() {
            return Err(BatonError::RunNotFound(run_id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let record: RunRecord = serde_yaml::from_str(&data)?;
        Ok(record)
    }

    /// All recorded runs, oldest first. An absent runs directory is an empty
    /// history, not an error.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::runs_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            let record: RunRecord = serde_yaml::from_str(&data)?;
            records.push(record);
        }
        records.sort_by_key(|r| r.report.started_at);
        Ok(records)
    }

    /// Recorded run ids, oldest first. Reads only the id and start time out
    /// of each record; the snapshot loader calls this on every run, so full
    /// reports stay on disk until someone asks for them.
    pub fn ids(root: &Path) -> Result<Vec<String>> {
        let dir = paths::runs_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut heads = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            let head: RecordHead = serde_yaml::from_str(&data)?;
            heads.push(head.report);
        }
        heads.sort_by_key(|h| h.started_at);
        Ok(heads.into_iter().map(|h| h.run_id).collect())
    }
}

/// The slice of a run record `ids` needs; everything else is skipped.
#[derive(Deserialize)]
struct RecordHead {
    report: ReportHead,
}

#[derive(Deserialize)]
struct ReportHead {
    run_id: String,
    started_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
