//! Task use-case service.
//!
//! # Responsibility
//! - Provide add/edit/delete/list/filter entry points for CLI callers.
//! - Validate raw status input before it reaches the model.
//! - Run each operation as one load-mutate-save pass over the store.
//!
//! # Invariants
//! - Rejected operations (`NotFound`, `AlreadyExists`, invalid input) issue
//!   no store writes.
//! - Add and delete persist collection and counter through one `commit`.
//! - Titles are never written to logs; only ids and counts are.

use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No task carries the requested id.
    NotFound(TaskId),
    /// Another task already uses this title.
    AlreadyExists(String),
    /// Status text is not one of `todo|doing|done`.
    InvalidStatus(String),
    /// Task input failed model validation.
    Validation(TaskValidationError),
    /// Persisted counter is at the edge of the id range.
    CounterOverflow(i64),
    /// Persistence-layer failure, including malformed documents.
    Store(StoreError),
}

impl ServiceError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::InvalidStatus(_) => "invalid_status",
            Self::Validation(_) => "invalid_input",
            Self::CounterOverflow(_) => "counter_overflow",
            Self::Store(err) => err.code(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::AlreadyExists(title) => write!(f, "task already exists: `{title}`"),
            Self::InvalidStatus(value) => {
                write!(f, "invalid status `{value}`; expected todo|doing|done")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::CounterOverflow(value) => write!(f, "task counter cannot move past {value}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::InvalidStatus(raw) => Self::InvalidStatus(raw),
            TaskValidationError::CounterOverflow(value) => Self::CounterOverflow(value),
            other => Self::Validation(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Field changes for `TaskService::edit`.
///
/// `None` and blank values leave the corresponding attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    pub title: Option<String>,
    pub status: Option<String>,
}

/// Task service facade over a store implementation.
pub struct TaskService<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a task with the next counter id.
    ///
    /// # Contract
    /// - `status` defaults to `todo` when absent or blank.
    /// - Returns `AlreadyExists` without writing when the title is taken.
    /// - Persists the collection and the advanced counter in one commit.
    pub fn add(&self, title: impl Into<String>, status: Option<&str>) -> ServiceResult<Task> {
        let title = title.into();
        let result = self.add_inner(title, status);
        match &result {
            Ok(task) => info!(
                "event=task_add module=service status=ok id={} task_status={}",
                task.id, task.status
            ),
            Err(err) => log_rejection("task_add", err),
        }
        result
    }

    fn add_inner(&self, title: String, status: Option<&str>) -> ServiceResult<Task> {
        let status = parse_optional_status(status)?.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle.into());
        }

        let mut tasks = self.store.load_tasks()?;
        if tasks.iter().any(|task| task.title == title) {
            return Err(ServiceError::AlreadyExists(title));
        }

        let mut counter = self.store.load_counter()?;
        let task = Task::new(counter.advance()?, title, status)?;
        tasks.push(task.clone());
        self.store.commit(&tasks, counter)?;
        Ok(task)
    }

    /// Edits title and/or status of the first task with `id`.
    ///
    /// # Contract
    /// - Status input is validated before any store access.
    /// - `id` is never changed.
    /// - Title uniqueness is only enforced by `add`.
    pub fn edit(&self, id: TaskId, request: &EditTaskRequest) -> ServiceResult<Task> {
        let result = self.edit_inner(id, request);
        match &result {
            Ok(task) => info!(
                "event=task_edit module=service status=ok id={} task_status={}",
                task.id, task.status
            ),
            Err(err) => log_rejection("task_edit", err),
        }
        result
    }

    fn edit_inner(&self, id: TaskId, request: &EditTaskRequest) -> ServiceResult<Task> {
        let status = parse_optional_status(request.status.as_deref())?;
        let title = request
            .title
            .as_deref()
            .filter(|value| !value.trim().is_empty());

        let mut tasks = self.store.load_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(ServiceError::NotFound(id))?;

        if let Some(title) = title {
            task.title = title.to_string();
        }
        if let Some(status) = status {
            task.status = status;
        }
        let updated = task.clone();

        self.store.save_tasks(&tasks)?;
        Ok(updated)
    }

    /// Removes the first task with `id` and steps the counter back.
    ///
    /// Returns the remaining collection in stored order.
    pub fn delete(&self, id: TaskId) -> ServiceResult<Vec<Task>> {
        let result = self.delete_inner(id);
        match &result {
            Ok(remaining) => info!(
                "event=task_delete module=service status=ok id={} remaining={}",
                id,
                remaining.len()
            ),
            Err(err) => log_rejection("task_delete", err),
        }
        result
    }

    fn delete_inner(&self, id: TaskId) -> ServiceResult<Vec<Task>> {
        let mut tasks = self.store.load_tasks()?;
        let position = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        tasks.remove(position);

        let mut counter = self.store.load_counter()?;
        counter.release()?;
        self.store.commit(&tasks, counter)?;
        Ok(tasks)
    }

    /// Lists all tasks in stored order.
    pub fn list(&self) -> ServiceResult<Vec<Task>> {
        let tasks = self.store.load_tasks()?;
        info!(
            "event=task_list module=service status=ok count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    /// Lists tasks whose status equals `status`, keeping stored order.
    pub fn filter(&self, status: &str) -> ServiceResult<Vec<Task>> {
        let status = match TaskStatus::parse(status) {
            Ok(status) => status,
            Err(err) => {
                let err = ServiceError::from(err);
                log_rejection("task_filter", &err);
                return Err(err);
            }
        };

        let tasks: Vec<Task> = self
            .store
            .load_tasks()?
            .into_iter()
            .filter(|task| task.status == status)
            .collect();
        info!(
            "event=task_filter module=service status=ok task_status={} count={}",
            status,
            tasks.len()
        );
        Ok(tasks)
    }
}

fn parse_optional_status(value: Option<&str>) -> Result<Option<TaskStatus>, TaskValidationError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => TaskStatus::parse(raw).map(Some),
        _ => Ok(None),
    }
}

fn log_rejection(event: &str, err: &ServiceError) {
    match err {
        ServiceError::Store(store_err) => error!(
            "event={event} module=service status=error error_code={} error={}",
            err.code(),
            store_err
        ),
        _ => warn!(
            "event={event} module=service status=rejected error_code={}",
            err.code()
        ),
    }
}
