use std::fs;

use task_tracker::{Priority, Status, Task, TaskError, TaskRecord, TaskStore, DEFAULT_TASK_FILE};
use tempfile::tempdir;

fn records(store: &TaskStore) -> Vec<TaskRecord> {
    store.tasks().iter().map(Task::to_record).collect()
}

#[test]
fn restart_reproduces_tasks_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_TASK_FILE);

    let mut store = TaskStore::open(&path).unwrap();
    let inputs = [
        ("Pay rent", "before the 1st", "2024-03-01", Priority::High),
        ("Call mom", "", "2024-03-02", Priority::Low),
        ("File taxes", "form 1040", "2024-04-15", Priority::Medium),
        ("Leap day", "", "2024-02-29", Priority::Low),
    ];
    for (title, description, due, priority) in inputs {
        store.add_task(title, description, due, priority).unwrap();
    }
    store.complete_at(2).unwrap();
    drop(store);

    let restored = TaskStore::open(&path).unwrap();
    let got = records(&restored);
    assert_eq!(got.len(), inputs.len());
    for (record, (title, description, due, priority)) in got.iter().zip(inputs) {
        assert_eq!(record.title, title);
        assert_eq!(record.description, description);
        assert_eq!(record.due_date.format("%Y-%m-%d").to_string(), due);
        assert_eq!(record.priority, priority);
    }
    assert_eq!(got[2].status, Status::Completed);
    assert_eq!(restored.statistics().pending, 3);
}

#[test]
fn file_holds_plain_task_objects() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_TASK_FILE);

    let mut store = TaskStore::open(&path).unwrap();
    store
        .add_task("Pay rent", "", "2024-03-01", Priority::High)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let tasks = value.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    let object = tasks[0].as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["description", "due_date", "priority", "status", "title"]);
    assert_eq!(object["due_date"], "2024-03-01");
    assert_eq!(object["status"], "Pending");
}

#[test]
fn file_written_by_hand_is_restored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_TASK_FILE);
    fs::write(
        &path,
        r#"[
            {"title": "a", "description": "", "due_date": "2024-01-01", "priority": "High", "status": "Completed"},
            {"title": "b", "description": "x", "due_date": "2024-01-02", "priority": "Medium", "status": "Pending"}
        ]"#,
    )
    .unwrap();

    let store = TaskStore::open(&path).unwrap();
    let chart = store.chart_counts();
    assert_eq!(chart.get(Priority::High).completed, 1);
    assert_eq!(chart.get(Priority::Medium).pending, 1);
    assert_eq!(chart.total(), 2);
}

#[test]
fn missing_key_in_file_fails_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_TASK_FILE);
    fs::write(
        &path,
        r#"[{"title": "a", "due_date": "2024-01-01", "priority": "High", "status": "Pending"}]"#,
    )
    .unwrap();

    let err = TaskStore::open(&path).unwrap_err();
    assert!(matches!(err, TaskError::CorruptData { .. }));
}
