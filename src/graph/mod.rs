use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type TaskId = u64;

/// Read-only projection of a [`TaskRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: TaskId,
    pub title: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_epic: bool,
    pub estimated_hours: Option<f64>,
}

impl From<&TaskRecord> for GraphNode {
    fn from(task: &TaskRecord) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            priority: task.priority.clone(),
            kind: task.kind.clone(),
            is_epic: task.is_epic,
            estimated_hours: task.estimated_hours,
        }
    }
}

impl GraphNode {
    pub(crate) fn placeholder(id: TaskId) -> Self {
        Self {
            id,
            title: String::new(),
            priority: String::new(),
            kind: String::new(),
            is_epic: false,
            estimated_hours: None,
        }
    }
}

/// Relation an edge was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    DependsOn,
    BlockedBy,
    Prerequisite,
    ChildOf,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::DependsOn => "depends_on",
            EdgeKind::BlockedBy => "blocked_by",
            EdgeKind::Prerequisite => "prerequisite",
            EdgeKind::ChildOf => "child_of",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `from` has to complete before `to` can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: TaskId,
    pub to: TaskId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(from: TaskId, to: TaskId, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}

/// Node/edge view of a task snapshot. Only [`builder::GraphBuilder`] creates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
}

impl DependencyGraph {
    pub(crate) fn from_parts(nodes: Vec<GraphNode>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: TaskId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}

pub mod adjacency;
pub mod builder;
pub mod dag;

pub use adjacency::{AdjacencyEntry, AdjacencyList};
pub use builder::GraphBuilder;
pub use dag::TaskDag;
