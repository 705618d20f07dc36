use std::fs;
use task_planner::persistence::{read_json, save_execution_order_to_csv, write_json};
use task_planner::{
    ArtifactDir, DependencyGraph, ExecutionOrderEntry, GraphContext, InputError, Planner,
    TaskRecord, TaskState, drop_closed_tasks, load_tasks_from_json,
};
use tempfile::{NamedTempFile, tempdir};

const SNAPSHOT: &str = r#"[
  {"id": 1, "title": "Design", "priority": "P1", "type": "feature", "estimated_hours": 4,
   "state": "CLOSED"},
  {"id": 2, "title": "Build", "priority": "P0", "depends_on": [1], "estimated_hours": 6},
  {"id": 3, "title": "Test", "blocked_by": [2], "prerequisites": [99], "state": "IN_REVIEW"},
  {"id": 4, "title": "Ship", "depends_on": [2, 3], "parent_id": 10}
]"#;

fn snapshot_file() -> NamedTempFile {
    let file = NamedTempFile::new().expect("create temp file");
    fs::write(file.path(), SNAPSHOT).expect("write snapshot");
    file
}

#[test]
fn snapshot_loads_with_defaults_for_missing_fields() {
    let file = snapshot_file();
    let tasks = load_tasks_from_json(file.path()).unwrap();

    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[0].kind, "feature");
    assert_eq!(tasks[0].state, TaskState::Closed);
    assert_eq!(tasks[2].state, TaskState::Other);
    assert_eq!(tasks[3].state, TaskState::Open);
    assert_eq!(tasks[3].estimated_hours, None);
    assert_eq!(tasks[3].parent_id, Some(10));
}

#[test]
fn skip_closed_treats_finished_work_as_satisfied() {
    let file = snapshot_file();
    let tasks = drop_closed_tasks(load_tasks_from_json(file.path()).unwrap());

    let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert!(tasks[0].depends_on.is_empty());
    // unknown references are left for the validator
    assert_eq!(tasks[1].prerequisites, vec![99]);
    assert_eq!(tasks[2].parent_id, Some(10));
}

#[test]
fn duplicate_ids_fail_fast() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"[{"id": 7}, {"id": 7}]"#).unwrap();

    let err = load_tasks_from_json(file.path()).unwrap_err();
    assert!(matches!(err, InputError::DuplicateId(7)));
}

#[test]
fn malformed_and_missing_input_are_input_errors() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"[{"id": "seven"}]"#).unwrap();
    let err = load_tasks_from_json(file.path()).unwrap_err();
    assert!(matches!(err, InputError::Json { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));

    let dir = tempdir().unwrap();
    let err = load_tasks_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, InputError::Read { .. }));
}

#[test]
fn negative_hours_are_rejected_on_load() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"[{"id": 1, "estimated_hours": -2}]"#).unwrap();
    let err = load_tasks_from_json(file.path()).unwrap_err();
    assert!(matches!(err, InputError::InvalidHours { id: 1, .. }));
}

#[test]
fn graph_artifact_round_trips_and_ends_with_newline() {
    let file = snapshot_file();
    let context = GraphContext::new(load_tasks_from_json(file.path()).unwrap()).unwrap();
    let dir = tempdir().unwrap();
    let artifacts = ArtifactDir::new(dir.path());

    let path = artifacts
        .write_json(ArtifactDir::DEPENDENCY_GRAPH, context.graph())
        .unwrap();
    let body = fs::read_to_string(&path).unwrap();
    assert!(body.ends_with("}\n"));

    let restored: DependencyGraph = read_json(&path).unwrap();
    assert_eq!(&restored, context.graph());

    // rewriting the same artifact is byte-identical
    write_json(&path, context.graph()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), body);
}

#[test]
fn adjacency_artifact_is_keyed_by_id() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "a"),
        TaskRecord::new(2, "b").depending_on([1]),
    ])
    .unwrap();
    let json = serde_json::to_value(context.adjacency()).unwrap();

    assert_eq!(json["1"]["successors"], serde_json::json!([2]));
    assert_eq!(json["2"]["predecessors"], serde_json::json!([1]));
    assert_eq!(json["2"]["successors"], serde_json::json!([]));
}

#[test]
fn execution_order_exports_to_json_and_csv() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "Design").with_priority("P1").with_hours(4.0),
        TaskRecord::new(2, "Build").depending_on([1]).with_hours(6.0),
        TaskRecord::new(3, "Test").depending_on([1, 2]),
    ])
    .unwrap();
    let planner = Planner::new(&context);
    let run = planner.run().unwrap();
    let entries = ExecutionOrderEntry::from_order(&run.order, &context);

    assert_eq!(entries[0].order, 1);
    assert_eq!(entries[0].blocks, vec![2, 3]);
    assert_eq!(entries[2].depends_on, vec![1, 2]);
    assert_eq!(entries[2].estimated_hours, 0.0);

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join(ArtifactDir::EXECUTION_ORDER_CSV);
    save_execution_order_to_csv(&entries, &csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["order", "id", "title", "priority", "estimated_hours", "depends_on", "blocks"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][5], "");
    assert_eq!(&rows[0][6], "2;3");
    assert_eq!(&rows[2][5], "1;2");
}
