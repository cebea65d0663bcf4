//! Persistence layer for the task collection and identifier counter.
//!
//! # Responsibility
//! - Define the storage contract consumed by the service layer.
//! - Keep file format and write strategy details inside the store boundary.
//!
//! # Invariants
//! - Absent or empty documents load as empty values, never as errors.
//! - Present but malformed documents are reported, never replaced by defaults.
//! - Saves overwrite a document in full.
//!
//! # See also
//! - `crate::config::StoreConfig` for document locations.

use crate::model::task::{Counter, Task};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_store;

pub use json_store::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while reading or writing a persisted document.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure (permission denied, disk full, ...).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document exists but is not a valid task/counter document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// In-memory value could not be encoded.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Path of the document the failure relates to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Serialize { path, .. } => {
                path.as_path()
            }
        }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Parse { .. } => "parse_failed",
            Self::Serialize { .. } => "serialize_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "malformed document `{}`: {source}", path.display())
            }
            Self::Serialize { path, source } => {
                write!(f, "failed to encode `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Serialize { source, .. } => Some(source),
        }
    }
}

/// Storage contract for the task collection and counter documents.
pub trait TaskStore {
    /// Loads the ordered task collection; empty when absent.
    fn load_tasks(&self) -> StoreResult<Vec<Task>>;
    /// Loads the counter; zero when absent.
    fn load_counter(&self) -> StoreResult<Counter>;
    /// Overwrites the task collection document.
    fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()>;
    /// Overwrites the counter document.
    fn save_counter(&self, counter: Counter) -> StoreResult<()>;
    /// Persists collection and counter together.
    ///
    /// Implementations should make a failure leave both documents in their
    /// previous state as far as the backing storage allows.
    fn commit(&self, tasks: &[Task], counter: Counter) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        (**self).load_tasks()
    }

    fn load_counter(&self) -> StoreResult<Counter> {
        (**self).load_counter()
    }

    fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        (**self).save_tasks(tasks)
    }

    fn save_counter(&self, counter: Counter) -> StoreResult<()> {
        (**self).save_counter(counter)
    }

    fn commit(&self, tasks: &[Task], counter: Counter) -> StoreResult<()> {
        (**self).commit(tasks, counter)
    }
}
