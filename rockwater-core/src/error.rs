//! Typed failures for malformed scheduler input and task-list edits.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("task '{id}' has negative duration ({minutes}m)")]
    NegativeDuration { id: String, minutes: i32 },

    #[error("anchored task '{id}' has no start time")]
    MissingStartTime { id: String },

    #[error("task '{id}' runs past the representable range of minutes or time")]
    DurationOverflow { id: String },

    #[error("task not found: {id}")]
    UnknownTask { id: String },

    #[error("index {index} out of range for {len} tasks")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
