use crate::context::StageContext;
use crate::error::Result;
use crate::report::StageResult;
use crate::types::StageId;
use std::collections::BTreeMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// StageHandler
// ---------------------------------------------------------------------------

/// The work behind one stage.
///
/// Handlers are opaque to the executor: they read and write the shared
/// context, block until done, and report an outcome. A handler returns `Err`
/// only for infrastructure problems (could not start at all); work that ran
/// and failed is an `Ok` result with a failed status.
pub trait StageHandler: Send + Sync {
    fn handle(&self, stage: StageId, ctx: &mut StageContext) -> Result<StageResult>;
}

/// Adapter so closures can act as handlers.
pub struct FnHandler<F>(pub F);

impl<F> StageHandler for FnHandler<F>
where
    F: Fn(StageId, &mut StageContext) -> Result<StageResult> + Send + Sync,
{
    fn handle(&self, stage: StageId, ctx: &mut StageContext) -> Result<StageResult> {
        (self.0)(stage, ctx)
    }
}

/// Placeholder handler that records the stage as done without doing work.
/// Scaffolded configs start every stage on this.
pub struct NoopHandler;

impl StageHandler for NoopHandler {
    fn handle(&self, stage: StageId, _ctx: &mut StageContext) -> Result<StageResult> {
        Ok(StageResult::ok(
            stage,
            format!("stage '{stage}' has no configured work"),
        ))
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

/// Maps stages to their handlers. Registering a stage twice replaces the
/// earlier handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<StageId, Arc<dyn StageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, stage: StageId, handler: Arc<dyn StageHandler>) {
        self.handlers.insert(stage, handler);
    }

    pub fn register_fn<F>(&mut self, stage: StageId, f: F)
    where
        F: Fn(StageId, &mut StageContext) -> Result<StageResult> + Send + Sync + 'static,
    {
        self.register(stage, Arc::new(FnHandler(f)));
    }

    pub fn get(&self, stage: StageId) -> Option<Arc<dyn StageHandler>> {
        self.handlers.get(&stage).cloned()
    }

    pub fn contains(&self, stage: StageId) -> bool {
        self.handlers.contains_key(&stage)
    }

    pub fn stages(&self) -> Vec<StageId> {
        self.handlers.keys().copied().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
