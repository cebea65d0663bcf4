use std::fs;
use std::path::Path;
use tasktrack_core::{
    Counter, EditTaskRequest, JsonFileStore, ServiceError, StoreConfig, StoreError, Task,
    TaskService, TaskStatus, TaskStore,
};
use tempfile::TempDir;

fn service_in_tempdir() -> (TempDir, TaskService<JsonFileStore>) {
    let dir = tempfile::tempdir().unwrap();
    let service = TaskService::new(JsonFileStore::new(StoreConfig::in_dir(dir.path())));
    (dir, service)
}

fn read_documents(dir: &Path) -> (Option<String>, Option<String>) {
    (
        fs::read_to_string(dir.join("db.json")).ok(),
        fs::read_to_string(dir.join("counter.json")).ok(),
    )
}

fn edit(title: Option<&str>, status: Option<&str>) -> EditTaskRequest {
    EditTaskRequest {
        title: title.map(str::to_string),
        status: status.map(str::to_string),
    }
}

#[test]
fn add_appends_task_with_next_counter_id() {
    let (_dir, service) = service_in_tempdir();

    let first = service.add("A", None).unwrap();
    let second = service.add("B", Some("doing")).unwrap();

    assert_eq!(first, Task::new(1, "A", TaskStatus::Todo).unwrap());
    assert_eq!(second, Task::new(2, "B", TaskStatus::Doing).unwrap());
    assert_eq!(service.list().unwrap(), vec![first, second]);
    assert_eq!(service.store().load_counter().unwrap(), Counter::new(2));
}

#[test]
fn add_uses_persisted_counter_not_collection_size() {
    let (_dir, service) = service_in_tempdir();
    service.store().save_counter(Counter::new(41)).unwrap();

    let task = service.add("answer", None).unwrap();
    assert_eq!(task.id, 42);
}

#[test]
fn add_duplicate_title_reports_already_exists_without_writes() {
    let (dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    let before = read_documents(dir.path());

    let err = service.add("A", Some("done")).unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists(title) if title == "A"));
    assert_eq!(read_documents(dir.path()), before);
}

#[test]
fn add_rejects_invalid_status_and_blank_title_without_writes() {
    let (dir, service) = service_in_tempdir();

    let err = service.add("A", Some("someday")).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(raw) if raw == "someday"));

    let err = service.add("  ", None).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    assert_eq!(read_documents(dir.path()), (None, None));
}

#[test]
fn edit_missing_id_reports_not_found_without_writes() {
    let (dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    let before = read_documents(dir.path());

    let err = service.edit(99, &edit(Some("B"), None)).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(99)));
    assert_eq!(read_documents(dir.path()), before);
}

#[test]
fn edit_status_only_preserves_title_and_id() {
    let (_dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();

    let updated = service.edit(1, &edit(None, Some("done"))).unwrap();
    assert_eq!(updated, Task::new(1, "A", TaskStatus::Done).unwrap());
    assert_eq!(service.list().unwrap(), vec![updated]);
}

#[test]
fn edit_blank_fields_leave_attributes_unchanged() {
    let (_dir, service) = service_in_tempdir();
    service.add("A", Some("doing")).unwrap();

    let updated = service.edit(1, &edit(Some(""), Some(" "))).unwrap();
    assert_eq!(updated, Task::new(1, "A", TaskStatus::Doing).unwrap());

    let renamed = service.edit(1, &edit(Some("A2"), None)).unwrap();
    assert_eq!(renamed, Task::new(1, "A2", TaskStatus::Doing).unwrap());
}

#[test]
fn edit_rejects_invalid_status_before_touching_store() {
    let (dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    let before = read_documents(dir.path());

    let err = service.edit(1, &edit(Some("B"), Some("paused"))).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(_)));
    assert_eq!(read_documents(dir.path()), before);
}

#[test]
fn edit_does_not_touch_counter() {
    let (_dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    service.edit(1, &edit(Some("renamed"), None)).unwrap();

    assert_eq!(service.store().load_counter().unwrap().value(), 1);
}

#[test]
fn delete_removes_exactly_one_entry_and_decrements_counter() {
    let (_dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    let b = service.add("B", None).unwrap();
    let c = service.add("C", None).unwrap();

    let remaining = service.delete(1).unwrap();
    assert_eq!(remaining, vec![b.clone(), c.clone()]);
    assert_eq!(service.list().unwrap(), vec![b, c]);
    assert_eq!(service.store().load_counter().unwrap().value(), 2);
}

#[test]
fn delete_missing_id_leaves_both_documents_unchanged() {
    let (dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    let before = read_documents(dir.path());

    let err = service.delete(7).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(7)));
    assert_eq!(read_documents(dir.path()), before);
}

#[test]
fn delete_then_add_reuses_counter_value() {
    let (_dir, service) = service_in_tempdir();
    service.add("A", None).unwrap();
    service.add("B", None).unwrap();
    service.delete(1).unwrap();

    let c = service.add("C", None).unwrap();
    assert_eq!(c.id, 2);
    let ids: Vec<i64> = service.list().unwrap().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![2, 2]);
}

#[test]
fn delete_can_drive_externally_edited_counter_negative() {
    let (_dir, service) = service_in_tempdir();
    let task = Task::new(5, "imported", TaskStatus::Todo).unwrap();
    service.store().save_tasks(&[task]).unwrap();

    service.delete(5).unwrap();
    assert_eq!(service.store().load_counter().unwrap().value(), -1);
}

#[test]
fn list_reflects_insertion_order_deletes_and_latest_edits() {
    let (_dir, service) = service_in_tempdir();
    service.add("one", None).unwrap();
    service.add("two", None).unwrap();
    service.add("three", None).unwrap();
    service.edit(3, &edit(None, Some("done"))).unwrap();
    service.delete(2).unwrap();
    service.add("four", None).unwrap();

    let titles: Vec<(String, TaskStatus)> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|task| (task.title, task.status))
        .collect();
    assert_eq!(
        titles,
        vec![
            ("one".to_string(), TaskStatus::Todo),
            ("three".to_string(), TaskStatus::Done),
            ("four".to_string(), TaskStatus::Todo),
        ]
    );
}

#[test]
fn filter_returns_matching_subset_in_stored_order() {
    let (_dir, service) = service_in_tempdir();
    service.add("a", Some("done")).unwrap();
    service.add("b", Some("todo")).unwrap();
    service.add("c", Some("done")).unwrap();
    service.add("d", Some("doing")).unwrap();

    let done = service.filter("done").unwrap();
    let expected: Vec<Task> = service
        .list()
        .unwrap()
        .into_iter()
        .filter(|task| task.status == TaskStatus::Done)
        .collect();
    assert_eq!(done, expected);
    assert_eq!(
        done.iter().map(|task| task.title.as_str()).collect::<Vec<_>>(),
        vec!["a", "c"]
    );
    assert!(service.filter("DOING").unwrap().iter().all(|task| task.title == "d"));
}

#[test]
fn filter_rejects_unknown_status() {
    let (_dir, service) = service_in_tempdir();
    let err = service.filter("archived").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(raw) if raw == "archived"));
}

#[test]
fn malformed_tasks_document_is_fatal_for_every_operation() {
    let (dir, service) = service_in_tempdir();
    fs::write(dir.path().join("db.json"), "{oops").unwrap();

    assert!(matches!(
        service.list(),
        Err(ServiceError::Store(StoreError::Parse { .. }))
    ));
    assert!(matches!(
        service.add("A", None),
        Err(ServiceError::Store(StoreError::Parse { .. }))
    ));
    assert!(matches!(
        service.delete(1),
        Err(ServiceError::Store(StoreError::Parse { .. }))
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("db.json")).unwrap(),
        "{oops"
    );
}

#[test]
fn scenario_add_duplicate_edit_delete() {
    let (_dir, service) = service_in_tempdir();

    let created = service.add("A", None).unwrap();
    assert_eq!(created, Task::new(1, "A", TaskStatus::Todo).unwrap());

    assert!(matches!(
        service.add("A", None),
        Err(ServiceError::AlreadyExists(_))
    ));

    let edited = service.edit(1, &edit(None, Some("doing"))).unwrap();
    assert_eq!(edited, Task::new(1, "A", TaskStatus::Doing).unwrap());

    let remaining = service.delete(1).unwrap();
    assert!(remaining.is_empty());
    assert!(service.list().unwrap().is_empty());
    assert_eq!(service.store().load_counter().unwrap(), Counter::new(0));
}

#[test]
fn service_accepts_borrowed_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(StoreConfig::in_dir(dir.path()));

    TaskService::new(&store).add("shared", None).unwrap();

    assert_eq!(store.load_tasks().unwrap().len(), 1);
}

#[test]
fn add_on_exhausted_counter_fails_without_writes() {
    let (dir, service) = service_in_tempdir();
    service.store().save_counter(Counter::new(i64::MAX)).unwrap();
    let before = read_documents(dir.path());

    let err = service.add("x", None).unwrap_err();
    assert!(matches!(err, ServiceError::CounterOverflow(i64::MAX)));
    assert_eq!(read_documents(dir.path()), before);
    assert_eq!(before.0, None);
}

#[test]
fn delete_on_counter_at_minimum_fails_without_writes() {
    let (dir, service) = service_in_tempdir();
    let task = Task::new(1, "edge", TaskStatus::Todo).unwrap();
    service.store().commit(&[task], Counter::new(i64::MIN)).unwrap();
    let before = read_documents(dir.path());

    let err = service.delete(1).unwrap_err();
    assert!(matches!(err, ServiceError::CounterOverflow(i64::MIN)));
    assert_eq!(read_documents(dir.path()), before);
}
