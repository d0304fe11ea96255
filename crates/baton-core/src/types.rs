use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RequestCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    NewProject,
    BugFix,
    Enhancement,
    Refactor,
}

impl RequestCategory {
    pub fn all() -> &'static [RequestCategory] {
        &[
            RequestCategory::NewProject,
            RequestCategory::BugFix,
            RequestCategory::Enhancement,
            RequestCategory::Refactor,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestCategory::NewProject => "new_project",
            RequestCategory::BugFix => "bug_fix",
            RequestCategory::Enhancement => "enhancement",
            RequestCategory::Refactor => "refactor",
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestCategory {
    type Err = crate::error::BatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_project" => Ok(RequestCategory::NewProject),
            "bug_fix" => Ok(RequestCategory::BugFix),
            "enhancement" => Ok(RequestCategory::Enhancement),
            "refactor" => Ok(RequestCategory::Refactor),
            _ => Err(crate::error::BatonError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StageId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Analyze,
    Architect,
    Database,
    Develop,
    Validate,
    Test,
}

impl StageId {
    pub fn all() -> &'static [StageId] {
        &[
            StageId::Analyze,
            StageId::Architect,
            StageId::Database,
            StageId::Develop,
            StageId::Validate,
            StageId::Test,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Analyze => "analyze",
            StageId::Architect => "architect",
            StageId::Database => "database",
            StageId::Develop => "develop",
            StageId::Validate => "validate",
            StageId::Test => "test",
        }
    }

    /// Heavy stages hand off to long-running implementation work and get a
    /// larger default time budget.
    pub fn is_heavy(self) -> bool {
        matches!(self, StageId::Develop | StageId::Test)
    }

    pub fn default_timeout_seconds(self) -> u64 {
        if self.is_heavy() {
            600
        } else {
            120
        }
    }

    /// Mandatory stages must have a handler registered before a run starts.
    pub fn is_mandatory(self) -> bool {
        matches!(self, StageId::Analyze | StageId::Validate)
    }

    /// Stages that still run after an earlier stage has failed.
    pub fn always_run_default(self) -> bool {
        matches!(self, StageId::Validate)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageId {
    type Err = crate::error::BatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analyze" => Ok(StageId::Analyze),
            "architect" => Ok(StageId::Architect),
            "database" => Ok(StageId::Database),
            "develop" => Ok(StageId::Develop),
            "validate" => Ok(StageId::Validate),
            "test" => Ok(StageId::Test),
            _ => Err(crate::error::BatonError::InvalidStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StageStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    Failed,
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Ok => "ok",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// SkipCause
// ---------------------------------------------------------------------------

/// Why a stage was skipped by the executor. A handler that reports its own
/// skipped status carries no cause; those skips do not fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCause {
    HandlerMissing,
    FailFast,
    Cancelled,
}

impl fmt::Display for SkipCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipCause::HandlerMissing => "handler_missing",
            SkipCause::FailFast => "fail_fast",
            SkipCause::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Passed,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Passed => "passed",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
