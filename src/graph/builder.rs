use super::{DependencyGraph, Edge, EdgeKind, GraphNode};
use crate::task::TaskRecord;
use std::collections::HashSet;
use tracing::debug;

pub struct GraphBuilder<'a> {
    tasks: &'a [TaskRecord],
}

impl<'a> GraphBuilder<'a> {
    pub fn new(tasks: &'a [TaskRecord]) -> Self {
        Self { tasks }
    }

    /// One node per task and one edge per declared relation.
    ///
    /// Edges that point at unknown ids are kept; reporting them is the validator's job.
    pub fn build(&self) -> DependencyGraph {
        let nodes: Vec<GraphNode> = self.tasks.iter().map(GraphNode::from).collect();

        let mut seen: HashSet<Edge> = HashSet::new();
        let mut edges = Vec::new();
        for task in self.tasks {
            for edge in Self::edges_for(task) {
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "built dependency graph"
        );
        DependencyGraph::from_parts(nodes, edges)
    }

    fn edges_for(task: &TaskRecord) -> impl Iterator<Item = Edge> + '_ {
        let to = task.id;
        let relations = [
            (EdgeKind::DependsOn, &task.depends_on),
            (EdgeKind::BlockedBy, &task.blocked_by),
            (EdgeKind::Prerequisite, &task.prerequisites),
        ];
        relations
            .into_iter()
            .flat_map(move |(kind, ids)| ids.iter().map(move |&from| Edge::new(from, to, kind)))
            .chain(
                task.parent_id
                    .map(|parent| Edge::new(parent, to, EdgeKind::ChildOf)),
            )
    }
}
