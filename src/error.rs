use crate::graph::TaskId;
use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed, missing or out-of-range input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
    #[error("task {id} has invalid estimated_hours {hours} (must be a finite number >= 0)")]
    InvalidHours { id: TaskId, hours: f64 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{offset_hours}h of work from {start} runs past the last representable date")]
    CalendarOverflow { start: NaiveDate, offset_hours: f64 },
}

/// Graph shapes that make scheduling impossible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("dependency graph contains {} cycle(s): {}", .cycles.len(), describe_cycles(.cycles))]
    CycleDetected { cycles: Vec<Vec<TaskId>> },
    #[error(
        "execution order is incomplete: placed {ordered} of {total} tasks, unplaced: {}",
        join_ids(.unplaced)
    )]
    IncompleteOrder {
        ordered: usize,
        total: usize,
        unplaced: Vec<TaskId>,
    },
    #[error("execution order lists task {task} more than once or it is not in the graph")]
    UnexpectedInOrder { task: TaskId },
    #[error("execution order places task {task} before its predecessor {predecessor}")]
    OrderViolation { predecessor: TaskId, task: TaskId },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_cycles(cycles: &[Vec<TaskId>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            let mut ids: Vec<String> = cycle.iter().map(|id| format!("#{id}")).collect();
            if let Some(first) = cycle.first() {
                ids.push(format!("#{first}"));
            }
            ids.join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
