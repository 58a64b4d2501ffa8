use thiserror::Error;

/// Failure taxonomy for the submission flow.
///
/// `Validation` never has side effects. `Storage` aborts a submit before the
/// record is written. `Persistence` after a successful file write leaves the
/// file behind (accepted orphan). `NotFound` is a plain lookup miss.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("file storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;
