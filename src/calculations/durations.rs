use crate::graph::TaskId;
use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hours per task. Unknown ids read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Durations {
    hours: BTreeMap<TaskId, f64>,
}

impl Durations {
    pub fn from_tasks(tasks: &[TaskRecord]) -> Self {
        Self {
            hours: tasks.iter().map(|task| (task.id, task.duration())).collect(),
        }
    }

    pub fn get(&self, id: TaskId) -> f64 {
        self.hours.get(&id).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, id: TaskId, hours: f64) {
        self.hours.insert(id, hours);
    }

    /// Copy of `self` with `overrides` applied on top.
    pub fn with_overrides(&self, overrides: &Durations) -> Self {
        let mut merged = self.clone();
        merged.hours.extend(overrides.hours.iter().map(|(&id, &h)| (id, h)));
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, f64)> + '_ {
        self.hours.iter().map(|(&id, &hours)| (id, hours))
    }

    pub fn total(&self) -> f64 {
        self.hours.values().sum()
    }
}

impl FromIterator<(TaskId, f64)> for Durations {
    fn from_iter<I: IntoIterator<Item = (TaskId, f64)>>(iter: I) -> Self {
        Self {
            hours: iter.into_iter().collect(),
        }
    }
}
