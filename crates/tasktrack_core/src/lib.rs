//! Core persistence and mutation logic for the task tracker.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Counter, Task, TaskId, TaskStatus, TaskValidationError};
pub use service::task_service::{EditTaskRequest, ServiceError, ServiceResult, TaskService};
pub use store::{JsonFileStore, StoreError, StoreResult, TaskStore};
