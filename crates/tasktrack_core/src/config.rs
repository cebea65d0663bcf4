//! Store location configuration.
//!
//! # Invariants
//! - Document paths are fixed at construction; the store never consults the
//!   process working directory on its own.

use std::path::{Path, PathBuf};

/// Default file name of the task collection document.
pub const TASKS_FILE_NAME: &str = "db.json";
/// Default file name of the identifier counter document.
pub const COUNTER_FILE_NAME: &str = "counter.json";

/// Paths of the two persisted documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub tasks_path: PathBuf,
    pub counter_path: PathBuf,
}

impl StoreConfig {
    pub fn new(tasks_path: impl Into<PathBuf>, counter_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            counter_path: counter_path.into(),
        }
    }

    /// Uses `db.json` and `counter.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(TASKS_FILE_NAME), dir.join(COUNTER_FILE_NAME))
    }
}
