use super::{DependencyGraph, EdgeKind, TaskId};
use petgraph::algo::is_cyclic_directed;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// petgraph view of a [`DependencyGraph`], used for DOT export.
pub struct TaskDag {
    pub graph: DiGraph<TaskId, EdgeKind>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
}

impl TaskDag {
    pub fn build(source: &DependencyGraph) -> Self {
        let mut graph: DiGraph<TaskId, EdgeKind> = DiGraph::new();
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::new();

        // Add nodes first
        for node in source.nodes() {
            let node_ix = graph.add_node(node.id);
            id_to_index.insert(node.id, node_ix);
        }

        // Add edges: prerequisite -> dependent
        for edge in source.edges() {
            if let (Some(&u), Some(&v)) = (id_to_index.get(&edge.from), id_to_index.get(&edge.to)) {
                graph.add_edge(u, v, edge.kind);
            }
        }

        Self { graph, id_to_index }
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    pub fn to_dot(&self) -> String {
        let body = Dot::with_config(&self.graph, &[Config::GraphContentOnly]);
        format!("digraph tasks {{\n{body}}}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::task::TaskRecord;

    #[test]
    fn builds_edges_between_known_tasks_only() {
        // 1 -> {2, 3}, 3 also depends on missing 9
        let tasks = vec![
            TaskRecord::new(1, "a"),
            TaskRecord::new(2, "b").depending_on([1]),
            TaskRecord::new(3, "c").depending_on([1, 9]),
        ];
        let dag = TaskDag::build(&GraphBuilder::new(&tasks).build());

        assert_eq!(dag.graph.node_count(), 3);
        assert_eq!(dag.graph.edge_count(), 2);
        assert!(dag.is_acyclic());
    }

    #[test]
    fn dot_output_labels_edges_with_their_kind() {
        let tasks = vec![TaskRecord::new(1, "a"), TaskRecord::new(2, "b").with_parent(1)];
        let dot = TaskDag::build(&GraphBuilder::new(&tasks).build()).to_dot();

        assert!(dot.starts_with("digraph tasks {"));
        assert!(dot.contains("child_of"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
