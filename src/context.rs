use crate::calculations::Durations;
use crate::error::InputError;
use crate::graph::{AdjacencyList, DependencyGraph, GraphBuilder, TaskId};
use crate::persistence::validate_tasks;
use crate::task::{TaskRecord, TaskState};
use std::collections::HashSet;
use tracing::debug;

/// Immutable inputs shared by every stage of one analysis run.
#[derive(Debug, Clone)]
pub struct GraphContext {
    tasks: Vec<TaskRecord>,
    graph: DependencyGraph,
    adjacency: AdjacencyList,
    durations: Durations,
}

impl GraphContext {
    pub fn new(tasks: Vec<TaskRecord>) -> Result<Self, InputError> {
        validate_tasks(&tasks)?;
        let graph = GraphBuilder::new(&tasks).build();
        let adjacency = AdjacencyList::from_graph(&graph);
        let durations = Durations::from_tasks(&tasks);
        Ok(Self {
            tasks,
            graph,
            adjacency,
            durations,
        })
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn task(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Removes CLOSED tasks and every reference to them; finished work no longer blocks.
///
/// References to ids absent from the snapshot are left alone for validation.
pub fn drop_closed_tasks(tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
    let closed: HashSet<TaskId> = tasks
        .iter()
        .filter(|task| task.state == TaskState::Closed)
        .map(|task| task.id)
        .collect();
    if closed.is_empty() {
        return tasks;
    }
    debug!(count = closed.len(), "dropping closed tasks from snapshot");

    tasks
        .into_iter()
        .filter(|task| !closed.contains(&task.id))
        .map(|mut task| {
            task.depends_on.retain(|id| !closed.contains(id));
            task.blocked_by.retain(|id| !closed.contains(id));
            task.prerequisites.retain(|id| !closed.contains(id));
            if task.parent_id.is_some_and(|parent| closed.contains(&parent)) {
                task.parent_id = None;
            }
            task
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_dependencies_count_as_satisfied() {
        let tasks = vec![
            TaskRecord::new(1, "done").with_state(TaskState::Closed),
            TaskRecord::new(2, "next").depending_on([1, 77]),
        ];
        let open = drop_closed_tasks(tasks);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].depends_on, vec![77]);
    }

    #[test]
    fn context_rejects_duplicate_ids() {
        let err = GraphContext::new(vec![TaskRecord::new(1, "a"), TaskRecord::new(1, "b")])
            .unwrap_err();
        assert!(matches!(err, InputError::DuplicateId(1)));
    }
}
