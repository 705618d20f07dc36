use super::cycles::AcyclicAdjacency;
use super::durations::Durations;
use crate::error::StructuralError;
use crate::graph::{AdjacencyList, TaskId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// One batch of mutually independent tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLevel {
    pub level: usize,
    pub task_count: usize,
    pub total_hours: f64,
    pub tasks: Vec<TaskId>,
}

pub struct TopologicalSorter<'a> {
    adjacency: &'a AdjacencyList,
}

impl<'a> TopologicalSorter<'a> {
    pub fn new(acyclic: AcyclicAdjacency<'a>) -> Self {
        Self {
            adjacency: acyclic.adjacency(),
        }
    }

    /// Kahn's algorithm; among ready tasks the lowest id goes first.
    pub fn sort(&self) -> Result<Vec<TaskId>, StructuralError> {
        let mut in_degree: HashMap<TaskId, usize> = self
            .adjacency
            .ids()
            .map(|id| (id, self.adjacency.in_degree(id)))
            .collect();
        let mut ready: BinaryHeap<Reverse<TaskId>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| Reverse(*id))
            .collect();

        let mut order = Vec::with_capacity(self.adjacency.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for succ in self.adjacency.successors(id) {
                if let Some(degree) = in_degree.get_mut(&succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(succ));
                    }
                }
            }
        }

        if order.len() < self.adjacency.len() {
            let placed: HashSet<TaskId> = order.iter().copied().collect();
            return Err(StructuralError::IncompleteOrder {
                ordered: order.len(),
                total: self.adjacency.len(),
                unplaced: self
                    .adjacency
                    .ids()
                    .filter(|id| !placed.contains(id))
                    .collect(),
            });
        }
        debug!(tasks = order.len(), "computed topological order");
        Ok(order)
    }

    /// Groups `order` into waves: each task sits one level above its deepest
    /// predecessor. `order` must be a topological order of the whole index.
    pub fn levelize(
        &self,
        order: &[TaskId],
        durations: &Durations,
    ) -> Result<Vec<ExecutionLevel>, StructuralError> {
        check_order(self.adjacency, order)?;

        let mut level_of: HashMap<TaskId, usize> = HashMap::with_capacity(order.len());
        let mut waves: BTreeMap<usize, Vec<TaskId>> = BTreeMap::new();
        for &id in order {
            let level = self
                .adjacency
                .predecessors(id)
                .filter_map(|pred| level_of.get(&pred))
                .map(|&level| level + 1)
                .max()
                .unwrap_or(0);
            level_of.insert(id, level);
            waves.entry(level).or_default().push(id);
        }

        let levels: Vec<ExecutionLevel> = waves
            .into_iter()
            .map(|(level, mut tasks)| {
                tasks.sort_unstable();
                ExecutionLevel {
                    level,
                    task_count: tasks.len(),
                    total_hours: tasks.iter().map(|&id| durations.get(id)).sum(),
                    tasks,
                }
            })
            .collect();

        debug!(levels = levels.len(), "computed execution levels");
        Ok(levels)
    }
}

/// Checks that `order` lists every task of `adjacency` once, predecessors first.
pub(crate) fn check_order(
    adjacency: &AdjacencyList,
    order: &[TaskId],
) -> Result<(), StructuralError> {
    let mut position: HashMap<TaskId, usize> = HashMap::with_capacity(order.len());
    for (pos, &task) in order.iter().enumerate() {
        if !adjacency.contains(task) || position.insert(task, pos).is_some() {
            return Err(StructuralError::UnexpectedInOrder { task });
        }
    }

    if position.len() < adjacency.len() {
        return Err(StructuralError::IncompleteOrder {
            ordered: position.len(),
            total: adjacency.len(),
            unplaced: adjacency
                .ids()
                .filter(|id| !position.contains_key(id))
                .collect(),
        });
    }

    for (task_pos, &task) in order.iter().enumerate() {
        if let Some(predecessor) = adjacency
            .predecessors(task)
            .find(|pred| position.get(pred).is_none_or(|&pos| pos >= task_pos))
        {
            return Err(StructuralError::OrderViolation { predecessor, task });
        }
    }
    Ok(())
}
