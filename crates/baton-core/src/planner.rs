use crate::request::Vocabulary;
use crate::types::{RequestCategory, StageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// StagePlan
// ---------------------------------------------------------------------------

/// An ordered, duplicate-free list of stages for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagePlan {
    stages: Vec<StageId>,
}

impl StagePlan {
    pub(crate) fn new(stages: Vec<StageId>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn contains(&self, stage: StageId) -> bool {
        self.stages.contains(&stage)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for StagePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for stage in &self.stages {
            if !first {
                f.write_str(" -> ")?;
            }
            f.write_str(stage.as_str())?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

fn base_stages(category: RequestCategory) -> Vec<StageId> {
    match category {
        RequestCategory::NewProject => vec![
            StageId::Analyze,
            StageId::Architect,
            StageId::Database,
            StageId::Develop,
            StageId::Validate,
            StageId::Test,
        ],
        RequestCategory::BugFix => vec![StageId::Analyze, StageId::Develop, StageId::Validate],
        RequestCategory::Enhancement => vec![
            StageId::Analyze,
            StageId::Architect,
            StageId::Develop,
            StageId::Validate,
            StageId::Test,
        ],
        RequestCategory::Refactor => vec![StageId::Analyze, StageId::Develop, StageId::Validate],
    }
}

/// Build the stage plan for a classified request.
///
/// Every category starts from a fixed base sequence. Data-layer keywords in
/// the request splice a DATABASE stage in after ARCHITECT, or after ANALYZE
/// when the plan has no ARCHITECT. Plans never contain a stage twice.
pub fn plan_for(
    category: RequestCategory,
    keywords: &BTreeSet<String>,
    vocabulary: &Vocabulary,
) -> StagePlan {
    let mut stages = base_stages(category);

    let wants_database = vocabulary
        .integration_terms()
        .iter()
        .any(|t| keywords.contains(t));
    if wants_database && !stages.contains(&StageId::Database) {
        let anchor = stages
            .iter()
            .position(|s| *s == StageId::Architect)
            .or_else(|| stages.iter().position(|s| *s == StageId::Analyze));
        let at = anchor.map_or(0, |i| i + 1);
        stages.insert(at, StageId::Database);
    }

    StagePlan::new(stages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    fn plan(category: RequestCategory, text: &str) -> StagePlan {
        let vocab = Vocabulary::default();
        let request = Request::from_text(text, &vocab);
        plan_for(category, &request.detected_keywords, &vocab)
    }

    #[test]
    fn new_project_plan() {
        assert_eq!(
            plan(RequestCategory::NewProject, "create a thing").stages(),
            &[
                StageId::Analyze,
                StageId::Architect,
                StageId::Database,
                StageId::Develop,
                StageId::Validate,
                StageId::Test,
            ]
        );
    }

    #[test]
    fn bug_fix_plan() {
        assert_eq!(
            plan(RequestCategory::BugFix, "fix the login bug").stages(),
            &[StageId::Analyze, StageId::Develop, StageId::Validate]
        );
    }

    #[test]
    fn enhancement_plan() {
        assert_eq!(
            plan(RequestCategory::Enhancement, "add dark mode").stages(),
            &[
                StageId::Analyze,
                StageId::Architect,
                StageId::Develop,
                StageId::Validate,
                StageId::Test,
            ]
        );
    }

    #[test]
    fn refactor_plan() {
        assert_eq!(
            plan(RequestCategory::Refactor, "refactor the scheduler").stages(),
            &[StageId::Analyze, StageId::Develop, StageId::Validate]
        );
    }

    #[test]
    fn schema_keyword_inserts_database_after_architect() {
        assert_eq!(
            plan(RequestCategory::Enhancement, "add schema versioning").stages(),
            &[
                StageId::Analyze,
                StageId::Architect,
                StageId::Database,
                StageId::Develop,
                StageId::Validate,
                StageId::Test,
            ]
        );
    }

    #[test]
    fn database_keyword_without_architect_goes_after_analyze() {
        assert_eq!(
            plan(RequestCategory::BugFix, "fix the broken database migration").stages(),
            &[
                StageId::Analyze,
                StageId::Database,
                StageId::Develop,
                StageId::Validate,
            ]
        );
    }

    #[test]
    fn database_never_duplicated() {
        let p = plan(RequestCategory::NewProject, "create a sql persistence layer");
        let db_count = p
            .stages()
            .iter()
            .filter(|s| **s == StageId::Database)
            .count();
        assert_eq!(db_count, 1);
    }

    #[test]
    fn every_category_yields_a_plan() {
        for &category in RequestCategory::all() {
            let p = plan(category, "anything at all");
            assert!(!p.is_empty());
            assert_eq!(p.stages()[0], StageId::Analyze);
            assert!(p.contains(StageId::Validate));
        }
    }

    #[test]
    fn plans_never_repeat_a_stage() {
        for &category in RequestCategory::all() {
            for text in ["plain request", "touch the database schema", "sql migration"] {
                let p = plan(category, text);
                let unique: BTreeSet<_> = p.stages().iter().collect();
                assert_eq!(unique.len(), p.len(), "{category}: {text}");
            }
        }
    }

    #[test]
    fn plan_display_joins_stages() {
        let p = plan(RequestCategory::BugFix, "fix it");
        assert_eq!(p.to_string(), "analyze -> develop -> validate");
    }
}
