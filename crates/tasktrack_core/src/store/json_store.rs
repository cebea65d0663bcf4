//! JSON file implementation of `TaskStore`.
//!
//! # Responsibility
//! - Read `db.json` / `counter.json` style documents.
//! - Write pretty-printed documents through temp file + rename.
//!
//! # Invariants
//! - A target document is only ever replaced by a fully written temp file.
//! - `commit` stages both temp files before touching either target.
//! - Staged temp files are removed when a write sequence fails.

use super::{StoreError, StoreResult, TaskStore};
use crate::config::StoreConfig;
use crate::model::task::{Counter, Task};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = ".tmp";

/// File-backed task store rooted at explicit document paths.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl TaskStore for JsonFileStore {
    fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        let tasks: Vec<Task> = logged("store_load", "tasks", || {
            read_document(&self.config.tasks_path)
        })?;
        debug!("event=store_load module=store doc=tasks count={}", tasks.len());
        Ok(tasks)
    }

    fn load_counter(&self) -> StoreResult<Counter> {
        logged("store_load", "counter", || {
            read_document(&self.config.counter_path)
        })
    }

    fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        logged("store_save", "tasks", || {
            let staged = stage_document(&self.config.tasks_path, &tasks)?;
            publish(&staged, &self.config.tasks_path)
        })
    }

    fn save_counter(&self, counter: Counter) -> StoreResult<()> {
        logged("store_save", "counter", || {
            let staged = stage_document(&self.config.counter_path, &counter)?;
            publish(&staged, &self.config.counter_path)
        })
    }

    fn commit(&self, tasks: &[Task], counter: Counter) -> StoreResult<()> {
        logged("store_commit", "tasks+counter", || {
            let staged_tasks = stage_document(&self.config.tasks_path, &tasks)?;
            let staged_counter = match stage_document(&self.config.counter_path, &counter) {
                Ok(path) => path,
                Err(err) => {
                    discard(&staged_tasks);
                    return Err(err);
                }
            };

            if let Err(err) = publish(&staged_tasks, &self.config.tasks_path) {
                discard(&staged_counter);
                return Err(err);
            }
            publish(&staged_counter, &self.config.counter_path)
        })
    }
}

/// Runs one store operation and emits an ok/error event with its duration.
fn logged<T>(
    event: &str,
    doc: &str,
    op: impl FnOnce() -> StoreResult<T>,
) -> StoreResult<T> {
    let started_at = Instant::now();
    match op() {
        Ok(value) => {
            info!(
                "event={event} module=store status=ok doc={doc} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            error!(
                "event={event} module=store status=error doc={doc} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn read_document<T: DeserializeOwned + Default>(path: &Path) -> StoreResult<T> {
    // Raw bytes so bad UTF-8 surfaces as a parse failure, not an I/O one.
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the encoded document next to `target` and returns the temp path.
fn stage_document<T: Serialize + ?Sized>(target: &Path, value: &T) -> StoreResult<PathBuf> {
    let mut encoded =
        serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
            path: target.to_path_buf(),
            source,
        })?;
    encoded.push('\n');

    if let Some(parent) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staged = temp_path(target);
    if let Err(source) = fs::write(&staged, encoded) {
        discard(&staged);
        return Err(StoreError::Io {
            path: staged,
            source,
        });
    }
    Ok(staged)
}

fn publish(staged: &Path, target: &Path) -> StoreResult<()> {
    fs::rename(staged, target).map_err(|source| {
        discard(staged);
        StoreError::Io {
            path: target.to_path_buf(),
            source,
        }
    })
}

fn discard(staged: &Path) {
    let _ = fs::remove_file(staged);
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::temp_path;
    use std::path::Path;

    #[test]
    fn temp_path_is_sibling_with_suffix() {
        assert_eq!(
            temp_path(Path::new("/data/db.json")),
            Path::new("/data/db.json.tmp")
        );
        assert_eq!(
            temp_path(Path::new("counter.json")),
            Path::new("counter.json.tmp")
        );
    }
}
