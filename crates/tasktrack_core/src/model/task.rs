//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its lifecycle status.
//! - Define the identifier counter document.
//!
//! # Invariants
//! - `id` is assigned once from `Counter::advance()` and never rewritten.
//! - `status` is always one of `todo`, `doing`, `done` on the wire.
//! - Field order on the wire is `id`, `title`, `status`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier handed out by the counter document.
pub type TaskId = i64;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    Doing,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// Parses user input into a status.
    ///
    /// Surrounding whitespace is ignored and matching is case-insensitive.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::InvalidStatus` with the raw input for
    ///   anything outside `todo|doing|done`.
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(TaskValidationError::InvalidStatus(value.to_string())),
        }
    }

    /// Wire value used in `db.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Status text is not a known lifecycle state.
    InvalidStatus(String),
    /// Counter cannot step past the `i64` range from this value.
    CounterOverflow(i64),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected todo|doing|done"
            ),
            Self::CounterOverflow(value) => {
                write!(f, "task counter cannot move past {value}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Unique across the collection at add time.
    pub title: String,
    pub status: TaskStatus,
}

impl Task {
    /// Creates a task, rejecting blank titles.
    ///
    /// The title is stored as given; only the blank check trims.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        status: TaskStatus,
    ) -> Result<Self, TaskValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Self { id, title, status })
    }
}

/// Identifier counter persisted as `{"counter": n}`.
///
/// Incremented on add and decremented on delete. Decrements are not floored,
/// so an externally edited document can drive the value below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub counter: i64,
}

impl Counter {
    pub fn new(value: i64) -> Self {
        Self { counter: value }
    }

    /// Current value.
    pub fn value(self) -> i64 {
        self.counter
    }

    /// Advances the counter and returns the id for the next task.
    ///
    /// Leaves the counter unchanged when it is already at `i64::MAX`.
    pub fn advance(&mut self) -> Result<TaskId, TaskValidationError> {
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or(TaskValidationError::CounterOverflow(self.counter))?;
        Ok(self.counter)
    }

    /// Steps the counter back after a delete.
    ///
    /// Leaves the counter unchanged when it is already at `i64::MIN`.
    pub fn release(&mut self) -> Result<(), TaskValidationError> {
        self.counter = self
            .counter
            .checked_sub(1)
            .ok_or(TaskValidationError::CounterOverflow(self.counter))?;
        Ok(())
    }
}
