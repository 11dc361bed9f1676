use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] taskboard_core::error::CoreError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("meeting not found: {0}")]
    MeetingNotFound(String),

    #[error("ambiguous id prefix '{prefix}': matches {count} records")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("task id already in use: {0}")]
    DuplicateTask(String),

    #[error("board not found (searched upward from {0})")]
    RepositoryNotFound(String),

    #[error("board already exists at {0}")]
    RepositoryExists(String),

    #[error("board is locked by another writer: {0}")]
    LockConflict(String),

    #[error("invalid input: {0}")]
    Validation(String),
}
