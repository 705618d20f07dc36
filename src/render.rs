use crate::graph::{DependencyGraph, EdgeKind, GraphNode};
use std::collections::HashSet;
use std::fmt::Write;

const PRIORITY_CLASSES: [(&str, &str); 4] = [
    ("p0", "fill:#f8d7da,stroke:#c82333,stroke-width:2px"),
    ("p1", "fill:#fff3cd,stroke:#e0a800"),
    ("p2", "fill:#d1ecf1,stroke:#138496"),
    ("p3", "fill:#e2e3e5,stroke:#6c757d"),
];

/// Mermaid flowchart of the graph. Edges to unknown tasks are skipped.
pub fn to_mermaid(graph: &DependencyGraph) -> String {
    let mut out = String::from("graph TD\n");
    for (class, style) in PRIORITY_CLASSES {
        let _ = writeln!(out, "    classDef {class} {style}");
    }

    for node in graph.nodes() {
        let _ = writeln!(out, "    T{}[\"{}\"]", node.id, label(node));
    }

    let known: HashSet<u64> = graph.nodes().iter().map(|n| n.id).collect();
    for edge in graph.edges() {
        if !known.contains(&edge.from) || !known.contains(&edge.to) {
            continue;
        }
        let arrow = match edge.kind {
            EdgeKind::ChildOf => "-.->",
            EdgeKind::BlockedBy => "==>",
            EdgeKind::DependsOn | EdgeKind::Prerequisite => "-->",
        };
        let _ = writeln!(out, "    T{} {arrow} T{}", edge.from, edge.to);
    }

    for node in graph.nodes() {
        if let Some(class) = priority_class(&node.priority) {
            let _ = writeln!(out, "    class T{} {class}", node.id);
        }
    }
    out
}

fn label(node: &GraphNode) -> String {
    let title = node.title.replace('"', "'");
    if node.is_epic {
        format!("#{} {} (epic)", node.id, title)
    } else {
        format!("#{} {}", node.id, title)
    }
}

fn priority_class(priority: &str) -> Option<&'static str> {
    let wanted = priority.trim().to_ascii_lowercase();
    PRIORITY_CLASSES
        .iter()
        .map(|(class, _)| *class)
        .find(|class| *class == wanted)
}
