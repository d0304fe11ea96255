//! Sequential stage execution.
//!
//! Stages run one at a time in plan order, each against the shared context.
//! A failed stage flips the run into fail-fast mode: later stages are
//! skipped, except stages marked always-run (VALIDATE by default), which
//! still execute so the run ends with an audit. Each stage runs under a time
//! budget; a stage that overruns is recorded as failed and its context
//! writes are discarded. Cancellation is cooperative and checked between
//! stages only.

use crate::context::StageContext;
use crate::error::{BatonError, Result};
use crate::handler::{HandlerRegistry, StageHandler};
use crate::planner::StagePlan;
use crate::report::StageResult;
use crate::types::{SkipCause, StageId, StageStatus};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// Shared flag for cooperative cancellation. The executor checks it before
/// each stage; a stage already running is left to finish its budget.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

pub struct Executor {
    registry: HandlerRegistry,
    budgets: BTreeMap<StageId, Duration>,
    always_run: BTreeSet<StageId>,
}

impl Executor {
    pub fn new(registry: HandlerRegistry) -> Self {
        let mut budgets = BTreeMap::new();
        let mut always_run = BTreeSet::new();
        for &stage in StageId::all() {
            budgets.insert(stage, Duration::from_secs(stage.default_timeout_seconds()));
            if stage.always_run_default() {
                always_run.insert(stage);
            }
        }
        Self {
            registry,
            budgets,
            always_run,
        }
    }

    pub fn set_budget(&mut self, stage: StageId, budget: Duration) {
        self.budgets.insert(stage, budget);
    }

    pub fn set_always_run(&mut self, stage: StageId, always: bool) {
        if always {
            self.always_run.insert(stage);
        } else {
            self.always_run.remove(&stage);
        }
    }

    pub fn budget(&self, stage: StageId) -> Duration {
        self.budgets
            .get(&stage)
            .copied()
            .unwrap_or_else(|| Duration::from_secs(stage.default_timeout_seconds()))
    }

    pub fn is_always_run(&self, stage: StageId) -> bool {
        self.always_run.contains(&stage)
    }

    /// Mandatory stages must be resolvable before anything runs.
    pub fn preflight(&self, plan: &StagePlan) -> Result<()> {
        for &stage in plan.stages() {
            if stage.is_mandatory() && !self.registry.contains(stage) {
                return Err(BatonError::MissingHandler(stage.to_string()));
            }
        }
        Ok(())
    }

    /// Run the plan to completion and return one result per planned stage,
    /// in plan order.
    pub fn execute(
        &self,
        plan: &StagePlan,
        ctx: &mut StageContext,
        cancel: &CancelToken,
    ) -> Result<Vec<StageResult>> {
        self.preflight(plan)?;

        let mut results = Vec::with_capacity(plan.len());
        let mut failed = false;

        for &stage in plan.stages() {
            if cancel.is_cancelled() {
                tracing::warn!(stage = %stage, "run cancelled, skipping stage");
                results.push(StageResult::skipped(
                    stage,
                    SkipCause::Cancelled,
                    "run cancelled before this stage",
                ));
                continue;
            }

            if failed && !self.is_always_run(stage) {
                results.push(StageResult::skipped(
                    stage,
                    SkipCause::FailFast,
                    "skipped after earlier stage failure",
                ));
                continue;
            }

            let Some(handler) = self.registry.get(stage) else {
                results.push(StageResult::skipped(
                    stage,
                    SkipCause::HandlerMissing,
                    format!("no handler registered for stage '{stage}'"),
                ));
                continue;
            };

            let result = self.run_stage(stage, handler, ctx);
            if result.status == StageStatus::Failed {
                failed = true;
            }
            results.push(result);
        }

        Ok(results)
    }

    fn run_stage(
        &self,
        stage: StageId,
        handler: Arc<dyn StageHandler>,
        ctx: &mut StageContext,
    ) -> StageResult {
        let budget = self.budget(stage);
        tracing::debug!(stage = %stage, budget_secs = budget.as_secs(), "stage starting");

        // The handler works on its own copy of the context. The copy replaces
        // the run context only when the handler finishes inside its budget,
        // so an abandoned handler never surfaces partial writes.
        let mut scoped = ctx.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = handler.handle(stage, &mut scoped);
            let _ = tx.send((outcome, scoped));
        });

        match rx.recv_timeout(budget) {
            Ok((Ok(mut result), scoped)) => {
                *ctx = scoped;
                result.stage = stage;
                tracing::debug!(stage = %stage, status = %result.status, "stage finished");
                result
            }
            Ok((Err(e), _)) => {
                tracing::warn!(stage = %stage, error = %e, "stage handler errored");
                StageResult::failed(stage, e.to_string())
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(stage = %stage, budget_secs = budget.as_secs(), "stage timed out");
                StageResult::failed(stage, format!("timed out after {}s", budget.as_secs()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!(stage = %stage, "stage handler aborted");
                StageResult::failed(stage, "handler aborted before returning a result")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
