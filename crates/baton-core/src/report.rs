use crate::planner::StagePlan;
use crate::types::{RequestCategory, RunStatus, SkipCause, StageId, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// The recorded outcome of one planned stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: StageId,
    pub status: StageStatus,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cause: Option<SkipCause>,
}

impl StageResult {
    pub fn ok(stage: StageId, summary: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Ok,
            summary: summary.into(),
            score: None,
            skip_cause: None,
        }
    }

    pub fn ok_with_score(stage: StageId, summary: impl Into<String>, score: u32) -> Self {
        Self {
            score: Some(score),
            ..Self::ok(stage, summary)
        }
    }

    pub fn failed(stage: StageId, summary: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Failed,
            summary: summary.into(),
            score: None,
            skip_cause: None,
        }
    }

    pub fn skipped(stage: StageId, cause: SkipCause, summary: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            summary: summary.into(),
            score: None,
            skip_cause: Some(cause),
        }
    }

    /// Whether this result alone forces the run to FAILED. Failures do;
    /// executor-imposed skips after a failure or cancellation do; a missing
    /// optional handler or a handler's own skipped status does not.
    pub fn blocks_pass(&self) -> bool {
        match self.status {
            StageStatus::Failed => true,
            StageStatus::Skipped => matches!(
                self.skip_cause,
                Some(SkipCause::FailFast) | Some(SkipCause::Cancelled)
            ),
            StageStatus::Ok => false,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowReport
// ---------------------------------------------------------------------------

/// Aggregate outcome of one run: classification, plan, per-stage results,
/// overall verdict, and the mean score across scored ok stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub run_id: String,
    pub category: RequestCategory,
    pub plan: StagePlan,
    pub results: Vec<StageResult>,
    pub overall_status: RunStatus,
    pub overall_score: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub fn build_report(
    run_id: String,
    category: RequestCategory,
    plan: StagePlan,
    results: Vec<StageResult>,
    started_at: DateTime<Utc>,
) -> WorkflowReport {
    let overall_status = if results.iter().any(StageResult::blocks_pass) {
        RunStatus::Failed
    } else {
        RunStatus::Passed
    };

    let scores: Vec<u32> = results
        .iter()
        .filter(|r| r.status == StageStatus::Ok)
        .filter_map(|r| r.score)
        .collect();
    let overall_score = if scores.is_empty() {
        0.0
    } else {
        f64::from(scores.iter().sum::<u32>()) / scores.len() as f64
    };

    WorkflowReport {
        run_id,
        category,
        plan,
        results,
        overall_status,
        overall_score,
        started_at,
        finished_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::StagePlan;

    fn report_for(results: Vec<StageResult>) -> WorkflowReport {
        let plan = StagePlan::new(results.iter().map(|r| r.stage).collect());
        build_report(
            "run-1".to_string(),
            RequestCategory::BugFix,
            plan,
            results,
            Utc::now(),
        )
    }

    #[test]
    fn mean_score_over_scored_ok_stages() {
        let report = report_for(vec![
            StageResult::ok_with_score(StageId::Analyze, "analyzed", 90),
            StageResult::ok_with_score(StageId::Develop, "developed", 95),
            StageResult::ok_with_score(StageId::Validate, "validated", 94),
        ]);
        assert_eq!(report.overall_status, RunStatus::Passed);
        assert!((report.overall_score - 93.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unscored_ok_stages_do_not_drag_the_mean() {
        let report = report_for(vec![
            StageResult::ok(StageId::Analyze, "analyzed"),
            StageResult::ok_with_score(StageId::Develop, "developed", 80),
        ]);
        assert!((report.overall_score - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_scores_means_zero() {
        let report = report_for(vec![StageResult::ok(StageId::Analyze, "analyzed")]);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.overall_status, RunStatus::Passed);
    }

    #[test]
    fn any_failure_fails_the_run() {
        let report = report_for(vec![
            StageResult::ok_with_score(StageId::Analyze, "analyzed", 100),
            StageResult::failed(StageId::Develop, "compile error"),
        ]);
        assert_eq!(report.overall_status, RunStatus::Failed);
        assert!((report.overall_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_stage_score_is_excluded() {
        let mut failed = StageResult::failed(StageId::Develop, "late failure");
        failed.score = Some(10);
        let report = report_for(vec![
            StageResult::ok_with_score(StageId::Analyze, "analyzed", 90),
            failed,
        ]);
        assert!((report.overall_score - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cascade_skip_fails_the_run() {
        let report = report_for(vec![
            StageResult::failed(StageId::Develop, "boom"),
            StageResult::skipped(StageId::Test, SkipCause::FailFast, "skipped after failure"),
        ]);
        assert_eq!(report.overall_status, RunStatus::Failed);
    }

    #[test]
    fn missing_handler_skip_is_benign() {
        let report = report_for(vec![
            StageResult::ok_with_score(StageId::Analyze, "analyzed", 90),
            StageResult::skipped(
                StageId::Architect,
                SkipCause::HandlerMissing,
                "no handler registered",
            ),
            StageResult::ok_with_score(StageId::Validate, "validated", 92),
        ]);
        assert_eq!(report.overall_status, RunStatus::Passed);
        assert!((report.overall_score - 91.0).abs() < f64::EPSILON);
    }

    #[test]
    fn handler_declared_skip_is_benign() {
        let voluntary = StageResult {
            stage: StageId::Test,
            status: StageStatus::Skipped,
            summary: "nothing to test".to_string(),
            score: None,
            skip_cause: None,
        };
        let report = report_for(vec![StageResult::ok(StageId::Analyze, "analyzed"), voluntary]);
        assert_eq!(report.overall_status, RunStatus::Passed);
    }

    #[test]
    fn cancelled_skip_fails_the_run() {
        let report = report_for(vec![StageResult::skipped(
            StageId::Analyze,
            SkipCause::Cancelled,
            "run cancelled",
        )]);
        assert_eq!(report.overall_status, RunStatus::Failed);
    }

    #[test]
    fn report_roundtrips_through_yaml() {
        let report = report_for(vec![
            StageResult::ok_with_score(StageId::Analyze, "analyzed", 88),
            StageResult::skipped(StageId::Test, SkipCause::FailFast, "skipped"),
        ]);
        let yaml = serde_yaml::to_string(&report).unwrap();
        let back: WorkflowReport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.results, report.results);
        assert_eq!(back.overall_status, report.overall_status);
    }

    #[test]
    fn skip_cause_omitted_when_absent() {
        let json =
            serde_json::to_string(&StageResult::ok(StageId::Analyze, "analyzed")).unwrap();
        assert!(!json.contains("skip_cause"));
        assert!(!json.contains("score"));
    }
}
