use super::durations::Durations;
use crate::graph::{AdjacencyList, TaskId};
use std::collections::HashMap;

pub struct BackwardPass<'a> {
    adjacency: &'a AdjacencyList,
    durations: &'a Durations,
}

impl<'a> BackwardPass<'a> {
    pub fn new(adjacency: &'a AdjacencyList, durations: &'a Durations) -> Self {
        Self {
            adjacency,
            durations,
        }
    }

    /// Latest (start, finish) per task, walking `order` back to front.
    pub fn execute(&self, order: &[TaskId], project_finish: f64) -> HashMap<TaskId, (f64, f64)> {
        let mut results: HashMap<TaskId, (f64, f64)> = HashMap::with_capacity(order.len());

        for &task_id in order.iter().rev() {
            // Sinks finish with the project; everyone else before its earliest-late successor
            let late_finish = self
                .adjacency
                .successors(task_id)
                .filter_map(|succ| results.get(&succ).map(|&(ls, _)| ls))
                .reduce(f64::min)
                .unwrap_or(project_finish);
            let late_start = late_finish - self.durations.get(task_id);
            results.insert(task_id, (late_start, late_finish));
        }

        results
    }
}
