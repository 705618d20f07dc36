use crate::error::StructuralError;
use crate::graph::{AdjacencyList, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Path in edge direction; the last id leads back to the first.
    pub task_ids: Vec<TaskId>,
}

/// Outcome of one detection run, bound to the adjacency index it inspected.
#[derive(Debug, Clone, Serialize)]
pub struct CycleDetection<'a> {
    pub has_cycles: bool,
    pub cycles: Vec<Cycle>,
    #[serde(skip)]
    adjacency: &'a AdjacencyList,
}

impl<'a> CycleDetection<'a> {
    /// Gate for ordering and CPM: yields the acyclic witness for the inspected
    /// index, or the itemized cycles.
    pub fn require_acyclic(&self) -> Result<AcyclicAdjacency<'a>, StructuralError> {
        if self.has_cycles {
            return Err(StructuralError::CycleDetected {
                cycles: self
                    .cycles
                    .iter()
                    .map(|cycle| cycle.task_ids.clone())
                    .collect(),
            });
        }
        Ok(AcyclicAdjacency {
            adjacency: self.adjacency,
        })
    }

    /// Ids that take part in at least one reported cycle.
    pub fn involved_ids(&self) -> BTreeSet<TaskId> {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.task_ids.iter().copied())
            .collect()
    }
}

/// An adjacency index that passed cycle detection.
#[derive(Debug, Clone, Copy)]
pub struct AcyclicAdjacency<'a> {
    adjacency: &'a AdjacencyList,
}

impl<'a> AcyclicAdjacency<'a> {
    pub fn adjacency(&self) -> &'a AdjacencyList {
        self.adjacency
    }

    /// Skips the gate so unit tests can feed a cyclic index to later stages.
    #[cfg(test)]
    pub(crate) fn unchecked(adjacency: &'a AdjacencyList) -> Self {
        Self { adjacency }
    }
}

struct Frame {
    node: TaskId,
    successors: Vec<TaskId>,
    next: usize,
}

impl Frame {
    fn enter(node: TaskId, adjacency: &AdjacencyList) -> Self {
        Self {
            node,
            successors: adjacency.successors(node).collect(),
            next: 0,
        }
    }
}

pub struct CycleDetector<'a> {
    adjacency: &'a AdjacencyList,
}

impl<'a> CycleDetector<'a> {
    pub fn new(adjacency: &'a AdjacencyList) -> Self {
        Self { adjacency }
    }

    /// Iterative DFS over every root in ascending id order.
    ///
    /// `path` mirrors the frame stack; `on_path` maps each node on it to its position
    /// so a back edge can slice out the cycle directly.
    pub fn detect(&self) -> CycleDetection<'a> {
        let mut visited: HashSet<TaskId> = HashSet::with_capacity(self.adjacency.len());
        let mut on_path: HashMap<TaskId, usize> = HashMap::new();
        let mut path: Vec<TaskId> = Vec::new();
        let mut cycles: Vec<Cycle> = Vec::new();

        for root in self.adjacency.ids() {
            if visited.contains(&root) {
                continue;
            }
            visited.insert(root);
            on_path.insert(root, path.len());
            path.push(root);
            let mut stack = vec![Frame::enter(root, self.adjacency)];

            while let Some(frame) = stack.last_mut() {
                let Some(&next) = frame.successors.get(frame.next) else {
                    let done = frame.node;
                    stack.pop();
                    path.pop();
                    on_path.remove(&done);
                    continue;
                };
                frame.next += 1;

                if let Some(&start) = on_path.get(&next) {
                    let task_ids = path[start..].to_vec();
                    debug!(?task_ids, "found dependency cycle");
                    cycles.push(Cycle { task_ids });
                } else if visited.insert(next) {
                    on_path.insert(next, path.len());
                    path.push(next);
                    stack.push(Frame::enter(next, self.adjacency));
                }
            }
        }

        if !cycles.is_empty() {
            warn!(count = cycles.len(), "dependency graph has cycles");
        }
        CycleDetection {
            has_cycles: !cycles.is_empty(),
            cycles,
            adjacency: self.adjacency,
        }
    }
}

pub fn detect_cycles(adjacency: &AdjacencyList) -> CycleDetection<'_> {
    CycleDetector::new(adjacency).detect()
}
