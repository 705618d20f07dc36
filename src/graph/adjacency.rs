use super::{DependencyGraph, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub successors: BTreeSet<TaskId>,
    pub predecessors: BTreeSet<TaskId>,
}

/// Successor/predecessor index keyed by task id, ascending.
///
/// Parallel edges of different kinds between the same two tasks collapse into
/// one relation here. Edges with an unknown endpoint are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyList {
    entries: BTreeMap<TaskId, AdjacencyEntry>,
}

impl AdjacencyList {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut entries: BTreeMap<TaskId, AdjacencyEntry> = graph
            .nodes()
            .iter()
            .map(|node| (node.id, AdjacencyEntry::default()))
            .collect();

        for edge in graph.edges() {
            if !entries.contains_key(&edge.from) || !entries.contains_key(&edge.to) {
                warn!(
                    from = edge.from,
                    to = edge.to,
                    kind = %edge.kind,
                    "edge references an unknown task; left out of the adjacency index"
                );
                continue;
            }
            if let Some(entry) = entries.get_mut(&edge.from) {
                entry.successors.insert(edge.to);
            }
            if let Some(entry) = entries.get_mut(&edge.to) {
                entry.predecessors.insert(edge.from);
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Task ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.entries.keys().copied()
    }

    pub fn entry(&self, id: TaskId) -> Option<&AdjacencyEntry> {
        self.entries.get(&id)
    }

    pub fn successors(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.entries
            .get(&id)
            .into_iter()
            .flat_map(|entry| entry.successors.iter().copied())
    }

    pub fn predecessors(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.entries
            .get(&id)
            .into_iter()
            .flat_map(|entry| entry.predecessors.iter().copied())
    }

    pub fn in_degree(&self, id: TaskId) -> usize {
        self.entries.get(&id).map_or(0, |entry| entry.predecessors.len())
    }

    pub fn is_source(&self, id: TaskId) -> bool {
        self.in_degree(id) == 0
    }

    pub fn is_sink(&self, id: TaskId) -> bool {
        self.entries
            .get(&id)
            .is_none_or(|entry| entry.successors.is_empty())
    }
}
