//! Shared error types for the services crate.

use thiserror::Error;

use storage::kv::StorageError;
use study_core::model::SessionError;
use study_core::timer::TimerError;

/// Errors emitted by `SessionService` and `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `GoalService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalServiceError {
    /// Input did not parse as a positive, finite number of hours. The
    /// previously stored goal is left untouched.
    #[error("invalid goal input: {raw:?}")]
    InvalidInput { raw: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TimerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimerServiceError {
    #[error("a subject is required to start the timer")]
    MissingSubject,
    #[error("timer state is unavailable: {0}")]
    Lock(String),
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error(transparent)]
    Session(#[from] SessionServiceError),
}
