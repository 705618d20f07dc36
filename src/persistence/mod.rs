use crate::error::InputError;
use crate::task::TaskRecord;
use std::collections::HashSet;

pub type PersistenceResult<T> = Result<T, InputError>;

/// Snapshot-level checks that must pass before a graph is built.
pub fn validate_tasks(tasks: &[TaskRecord]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(InputError::DuplicateId(task.id));
        }
        if let Some(hours) = task.estimated_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(InputError::InvalidHours { id: task.id, hours });
            }
        }
    }
    Ok(())
}

pub mod file;

pub use file::{
    ArtifactDir, load_tasks_from_json, read_json, save_execution_order_to_csv, write_json,
};
