use super::durations::Durations;
use crate::graph::{AdjacencyList, TaskId};
use std::collections::HashMap;

pub struct ForwardPass<'a> {
    adjacency: &'a AdjacencyList,
    durations: &'a Durations,
}

impl<'a> ForwardPass<'a> {
    pub fn new(adjacency: &'a AdjacencyList, durations: &'a Durations) -> Self {
        Self {
            adjacency,
            durations,
        }
    }

    /// Earliest (start, finish) per task, walking `order` front to back.
    pub fn execute(&self, order: &[TaskId]) -> HashMap<TaskId, (f64, f64)> {
        let mut results: HashMap<TaskId, (f64, f64)> = HashMap::with_capacity(order.len());

        for &task_id in order {
            // Early start is max of all predecessor finishes
            let early_start = self
                .adjacency
                .predecessors(task_id)
                .filter_map(|pred| results.get(&pred).map(|&(_, ef)| ef))
                .fold(0.0_f64, f64::max);
            let early_finish = early_start + self.durations.get(task_id);
            results.insert(task_id, (early_start, early_finish));
        }

        results
    }
}
