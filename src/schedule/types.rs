use chrono::NaiveDateTime;
use thiserror::Error;

/// Options du calcul de temps travaillé.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkingTimeOptions {
    /// Retire les pauses des postes du temps travaillé.
    pub subtract_breaks: bool,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("schedule already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid rotation: {0}")]
    InvalidRotation(String),
    #[error("invalid range: {from} is not before {to}")]
    InvalidRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
