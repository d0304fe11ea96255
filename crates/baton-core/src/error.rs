use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatonError {
    #[error("not initialized: run 'baton init'")]
    NotInitialized,

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("no handler registered for mandatory stage '{0}'")]
    MissingHandler(String),

    #[error("stage handler error: {0}")]
    Handler(String),

    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("issue already exists: {0}")]
    IssueExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BatonError>;
