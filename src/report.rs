//! Serialized shapes of the stage artifacts written to disk.

use crate::calculations::CycleDetection;
use crate::context::GraphContext;
use crate::graph::{DependencyGraph, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: TaskId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEntry {
    pub length: usize,
    pub tasks: Vec<TaskRef>,
    pub task_ids: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclesReport {
    pub has_cycles: bool,
    pub cycle_count: usize,
    pub cycles: Vec<CycleEntry>,
}

impl CyclesReport {
    pub fn new(detection: &CycleDetection<'_>, graph: &DependencyGraph) -> Self {
        let cycles = detection
            .cycles
            .iter()
            .map(|cycle| CycleEntry {
                length: cycle.task_ids.len(),
                tasks: cycle
                    .task_ids
                    .iter()
                    .map(|&id| TaskRef {
                        id,
                        title: graph.node(id).map(|n| n.title.clone()).unwrap_or_default(),
                    })
                    .collect(),
                task_ids: cycle.task_ids.clone(),
            })
            .collect::<Vec<_>>();
        Self {
            has_cycles: detection.has_cycles,
            cycle_count: cycles.len(),
            cycles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOrderEntry {
    /// 1-based position in the execution order.
    pub order: usize,
    pub id: TaskId,
    pub title: String,
    pub priority: String,
    pub estimated_hours: f64,
    pub depends_on: Vec<TaskId>,
    pub blocks: Vec<TaskId>,
}

impl ExecutionOrderEntry {
    pub fn from_order(order: &[TaskId], context: &GraphContext) -> Vec<Self> {
        let adjacency = context.adjacency();
        order
            .iter()
            .enumerate()
            .map(|(idx, &id)| {
                let node = context.graph().node(id);
                Self {
                    order: idx + 1,
                    id,
                    title: node.map(|n| n.title.clone()).unwrap_or_default(),
                    priority: node.map(|n| n.priority.clone()).unwrap_or_default(),
                    estimated_hours: context.durations().get(id),
                    depends_on: adjacency.predecessors(id).collect(),
                    blocks: adjacency.successors(id).collect(),
                }
            })
            .collect()
    }
}
