use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
