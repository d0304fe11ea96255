//! End-to-end run composition: snapshot, classify, plan, execute, report.

use crate::classifier::Classifier;
use crate::config::Config;
use crate::context::StageContext;
use crate::error::Result;
use crate::executor::{CancelToken, Executor};
use crate::handler::HandlerRegistry;
use crate::planner::plan_for;
use crate::report::{build_report, WorkflowReport};
use crate::request::{Request, Vocabulary};
use crate::snapshot::ProjectSnapshot;
use crate::types::StageId;
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

pub struct Engine {
    classifier: Classifier,
    executor: Executor,
}

impl Engine {
    /// Build an engine from a loaded config and a handler registry. Config
    /// stage overrides are applied to the executor here; after this the
    /// engine no longer consults the config.
    pub fn new(config: &Config, registry: HandlerRegistry) -> Self {
        let classifier = Classifier::new(Vocabulary::with_extensions(&config.keywords));
        let mut executor = Executor::new(registry);
        for &stage in StageId::all() {
            executor.set_budget(stage, config.stage_timeout(stage));
            executor.set_always_run(stage, config.stage_always_run(stage));
        }
        Self {
            classifier,
            executor,
        }
    }

    /// Snapshot the project under `root` and run the request against it.
    pub fn run(&self, root: &Path, request_text: &str) -> Result<WorkflowReport> {
        self.run_with(root, request_text, &CancelToken::new())
    }

    pub fn run_with(
        &self,
        root: &Path,
        request_text: &str,
        cancel: &CancelToken,
    ) -> Result<WorkflowReport> {
        let snapshot = ProjectSnapshot::load(root)?;
        self.run_snapshot(&snapshot, request_text, cancel)
    }

    /// Run against an explicit snapshot. Callers that already hold one (and
    /// tests) come through here.
    pub fn run_snapshot(
        &self,
        snapshot: &ProjectSnapshot,
        request_text: &str,
        cancel: &CancelToken,
    ) -> Result<WorkflowReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();

        let request = Request::from_text(request_text, self.classifier.vocabulary());
        let category = self.classifier.classify(&request, snapshot);
        let plan = plan_for(
            category,
            &request.detected_keywords,
            self.classifier.vocabulary(),
        );
        tracing::info!(
            run_id = %run_id,
            category = %category,
            plan = %plan,
            "request classified"
        );

        let mut ctx = StageContext::new();
        ctx.insert("request.text", json!(request.raw_text));
        ctx.insert("request.category", json!(category.as_str()));
        ctx.insert("request.keywords", json!(request.detected_keywords));
        ctx.insert("project.has_prior_docs", json!(snapshot.has_prior_docs));
        ctx.insert("project.prior_run_ids", json!(snapshot.prior_run_ids));
        ctx.insert("project.known_issues", json!(snapshot.known_issues));

        let results = self.executor.execute(&plan, &mut ctx, cancel)?;
        let report = build_report(run_id, category, plan, results, started_at);
        tracing::info!(
            run_id = %report.run_id,
            status = %report.overall_status,
            score = report.overall_score,
            "run finished"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::StageResult;
    use crate::types::{RequestCategory, RunStatus, StageStatus};
    use tempfile::TempDir;

    fn scored_registry(scores: &[(StageId, u32)]) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for &(stage, score) in scores {
            registry.register_fn(stage, move |stage, _ctx| {
                Ok(StageResult::ok_with_score(stage, "done", score))
            });
        }
        registry
    }

    fn docs_snapshot() -> ProjectSnapshot {
        ProjectSnapshot {
            has_prior_docs: true,
            ..ProjectSnapshot::empty()
        }
    }

    #[test]
    fn bug_fix_run_end_to_end() {
        let registry = scored_registry(&[
            (StageId::Analyze, 90),
            (StageId::Develop, 95),
            (StageId::Validate, 94),
        ]);
        let engine = Engine::new(&Config::new("demo"), registry);

        let report = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();

        assert_eq!(report.category, RequestCategory::BugFix);
        assert_eq!(
            report.plan.stages(),
            &[StageId::Analyze, StageId::Develop, StageId::Validate]
        );
        assert_eq!(report.overall_status, RunStatus::Passed);
        assert!((report.overall_score - 93.0).abs() < f64::EPSILON);
        assert!(!report.run_id.is_empty());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn fresh_project_run_end_to_end() {
        let mut registry = HandlerRegistry::new();
        for &stage in StageId::all() {
            registry.register_fn(stage, |stage, _ctx| Ok(StageResult::ok(stage, "done")));
        }
        let engine = Engine::new(&Config::new("demo"), registry);

        let report = engine
            .run_snapshot(
                &ProjectSnapshot::empty(),
                "Create a new inventory system",
                &CancelToken::new(),
            )
            .unwrap();

        assert_eq!(report.category, RequestCategory::NewProject);
        assert_eq!(
            report.plan.stages(),
            &[
                StageId::Analyze,
                StageId::Architect,
                StageId::Database,
                StageId::Develop,
                StageId::Validate,
                StageId::Test,
            ]
        );
        assert_eq!(report.overall_status, RunStatus::Passed);
    }

    #[test]
    fn context_is_seeded_before_the_first_stage() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn(StageId::Analyze, |stage, ctx| {
            let seeded = ctx.contains_key("request.text")
                && ctx.contains_key("request.category")
                && ctx.contains_key("request.keywords")
                && ctx.contains_key("project.has_prior_docs")
                && ctx.contains_key("project.known_issues");
            if seeded {
                Ok(StageResult::ok(stage, "seeded"))
            } else {
                Ok(StageResult::failed(stage, "context not seeded"))
            }
        });
        registry.register_fn(StageId::Develop, |stage, _ctx| {
            Ok(StageResult::ok(stage, "done"))
        });
        registry.register_fn(StageId::Validate, |stage, ctx| {
            match ctx.get("request.category").and_then(|v| v.as_str()) {
                Some("bug_fix") => Ok(StageResult::ok(stage, "category visible")),
                _ => Ok(StageResult::failed(stage, "category missing")),
            }
        });

        let engine = Engine::new(&Config::new("demo"), registry);
        let report = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();

        assert_eq!(report.overall_status, RunStatus::Passed);
    }

    #[test]
    fn failed_stage_fails_the_run_but_validate_reports() {
        let mut registry = scored_registry(&[(StageId::Analyze, 90), (StageId::Validate, 40)]);
        registry.register_fn(StageId::Develop, |stage, _ctx| {
            Ok(StageResult::failed(stage, "compile error"))
        });

        let engine = Engine::new(&Config::new("demo"), registry);
        let report = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();

        assert_eq!(report.overall_status, RunStatus::Failed);
        let validate = report
            .results
            .iter()
            .find(|r| r.stage == StageId::Validate)
            .unwrap();
        assert_eq!(validate.status, StageStatus::Ok);
    }

    #[test]
    fn run_ids_are_unique() {
        let registry = scored_registry(&[
            (StageId::Analyze, 90),
            (StageId::Develop, 95),
            (StageId::Validate, 94),
        ]);
        let engine = Engine::new(&Config::new("demo"), registry);

        let a = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();
        let b = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn run_loads_snapshot_from_disk() {
        let dir = TempDir::new().unwrap();
        let mut registry = HandlerRegistry::new();
        for &stage in StageId::all() {
            registry.register_fn(stage, |stage, _ctx| Ok(StageResult::ok(stage, "done")));
        }
        let engine = Engine::new(&Config::new("demo"), registry);

        // No docs on disk, so even a bug-worded request is a new project.
        let report = engine.run(dir.path(), "fix the broken thing").unwrap();
        assert_eq!(report.category, RequestCategory::NewProject);
    }

    #[test]
    fn config_timeout_override_reaches_the_executor() {
        let mut registry = scored_registry(&[(StageId::Analyze, 90), (StageId::Validate, 90)]);
        registry.register_fn(StageId::Develop, |stage, _ctx| {
            std::thread::sleep(std::time::Duration::from_millis(300));
            Ok(StageResult::ok(stage, "too slow"))
        });

        let mut config = Config::new("demo");
        config.stages.insert(
            "develop".to_string(),
            crate::config::StageOverride {
                timeout_seconds: Some(0),
                always_run: None,
            },
        );
        let engine = Engine::new(&config, registry);

        let report = engine
            .run_snapshot(&docs_snapshot(), "Fix the login bug", &CancelToken::new())
            .unwrap();

        let develop = report
            .results
            .iter()
            .find(|r| r.stage == StageId::Develop)
            .unwrap();
        assert_eq!(develop.status, StageStatus::Failed);
        assert!(develop.summary.contains("timed out"));
        assert_eq!(report.overall_status, RunStatus::Failed);
    }
}
