use task_planner::graph::TaskDag;
use task_planner::{AdjacencyList, Edge, EdgeKind, GraphBuilder, TaskRecord};

fn sample_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new(1, "Epic").as_epic().with_priority("P0"),
        TaskRecord::new(2, "Schema").with_parent(1).with_hours(3.0),
        TaskRecord::new(3, "API")
            .depending_on([2])
            .with_blockers([2])
            .with_prerequisites([99]),
        TaskRecord::new(4, "Docs").depending_on([3, 3]),
    ]
}

#[test]
fn one_node_per_task_in_input_order() {
    let tasks = sample_tasks();
    let graph = GraphBuilder::new(&tasks).build();

    assert_eq!(graph.nodes().len(), tasks.len());
    let ids: Vec<u64> = graph.nodes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert!(graph.node(1).unwrap().is_epic);
    assert_eq!(graph.node(2).unwrap().estimated_hours, Some(3.0));
}

#[test]
fn edges_are_derived_per_relation_and_deduplicated() {
    let graph = GraphBuilder::new(&sample_tasks()).build();

    assert_eq!(
        graph.edges(),
        &[
            Edge::new(1, 2, EdgeKind::ChildOf),
            Edge::new(2, 3, EdgeKind::DependsOn),
            Edge::new(2, 3, EdgeKind::BlockedBy),
            Edge::new(99, 3, EdgeKind::Prerequisite),
            Edge::new(3, 4, EdgeKind::DependsOn),
        ]
    );
}

#[test]
fn dangling_edges_stay_in_graph_but_not_in_adjacency() {
    let graph = GraphBuilder::new(&sample_tasks()).build();
    assert!(graph.edges().iter().any(|e| e.from == 99));

    let adjacency = AdjacencyList::from_graph(&graph);
    assert_eq!(adjacency.len(), 4);
    assert!(!adjacency.contains(99));
    assert_eq!(adjacency.predecessors(3).collect::<Vec<_>>(), vec![2]);
    assert_eq!(adjacency.successors(2).collect::<Vec<_>>(), vec![3]);
}

#[test]
fn graph_json_uses_type_for_edge_kind() {
    let graph = GraphBuilder::new(&sample_tasks()[..2]).build();
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["edges"][0]["type"], "child_of");
    assert_eq!(json["nodes"][0]["id"], 1);
}

#[test]
fn petgraph_view_matches_resolved_edges() {
    let graph = GraphBuilder::new(&sample_tasks()).build();
    let dag = TaskDag::build(&graph);

    assert_eq!(dag.graph.node_count(), 4);
    // the prerequisite on #99 has no endpoint to attach to
    assert_eq!(dag.graph.edge_count(), 4);
    assert!(dag.is_acyclic());
    assert!(dag.to_dot().starts_with("digraph tasks {"));
}
