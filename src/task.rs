use crate::graph::TaskId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(other, rename = "OTHER")]
    Other,
}

/// One task of the input snapshot, as produced by the dependency extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_epic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
    #[serde(default)]
    pub blocked_by: Vec<TaskId>,
    #[serde(default)]
    pub prerequisites: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,
    #[serde(default)]
    pub state: TaskState,
}

impl TaskRecord {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            priority: String::new(),
            kind: String::new(),
            is_epic: false,
            estimated_hours: None,
            depends_on: Vec::new(),
            blocked_by: Vec::new(),
            prerequisites: Vec::new(),
            parent_id: None,
            state: TaskState::Open,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn depending_on(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.depends_on.extend(ids);
        self
    }

    pub fn with_blockers(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.blocked_by.extend(ids);
        self
    }

    pub fn with_prerequisites(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.prerequisites.extend(ids);
        self
    }

    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn as_epic(mut self) -> Self {
        self.is_epic = true;
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Duration used by CPM. Missing hours count as an instantaneous task.
    pub fn duration(&self) -> f64 {
        self.estimated_hours.unwrap_or(0.0)
    }

    /// All ids this task waits on through `depends_on`, `blocked_by` and `prerequisites`.
    pub fn declared_dependencies(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.depends_on
            .iter()
            .chain(&self.blocked_by)
            .chain(&self.prerequisites)
            .copied()
    }
}
