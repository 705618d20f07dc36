//! Referential and structural checks over a built graph.
//!
//! Every check runs regardless of earlier failures. Failures are warnings for the
//! caller to triage; nothing here stops the pipeline.

use crate::graph::{DependencyGraph, TaskId};
use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

impl ValidationCheck {
    fn new(name: &str, passed: bool, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    fn from_checks(checks: Vec<ValidationCheck>) -> Self {
        let passed = checks.iter().filter(|check| check.passed).count();
        Self {
            total_checks: checks.len(),
            passed,
            failed: checks.len() - passed,
            checks,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|check| check.name == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

pub struct GraphValidator<'a> {
    graph: &'a DependencyGraph,
    tasks: &'a [TaskRecord],
}

impl<'a> GraphValidator<'a> {
    pub const NODE_COUNT: &'static str = "node_count";
    pub const NO_ORPHANED_EDGES: &'static str = "no_orphaned_edges";
    pub const DEPENDENCIES_RESOLVE: &'static str = "dependencies_resolve";
    pub const NO_SELF_DEPENDENCIES: &'static str = "no_self_dependencies";
    pub const EPICS_WITH_CHILDREN: &'static str = "epics_with_children";

    pub fn new(graph: &'a DependencyGraph, tasks: &'a [TaskRecord]) -> Self {
        Self { graph, tasks }
    }

    pub fn validate(&self) -> ValidationReport {
        let checks = vec![
            self.check_node_count(),
            self.check_orphaned_edges(),
            self.check_dependencies_resolve(),
            self.check_self_dependencies(),
            self.check_epics_with_children(),
        ];
        let report = ValidationReport::from_checks(checks);
        for failure in report.failures() {
            warn!(check = %failure.name, details = %failure.details, "validation check failed");
        }
        report
    }

    fn check_node_count(&self) -> ValidationCheck {
        let tasks = self.tasks.len();
        let nodes = self.graph.nodes().len();
        ValidationCheck::new(
            Self::NODE_COUNT,
            tasks == nodes,
            format!("{tasks} tasks, {nodes} nodes"),
        )
    }

    fn check_orphaned_edges(&self) -> ValidationCheck {
        let known: HashSet<TaskId> = self.graph.nodes().iter().map(|node| node.id).collect();
        let orphaned: Vec<String> = self
            .graph
            .edges()
            .iter()
            .filter(|edge| !known.contains(&edge.from) || !known.contains(&edge.to))
            .map(|edge| format!("{} -> {} ({})", edge.from, edge.to, edge.kind))
            .collect();
        let details = if orphaned.is_empty() {
            format!("all {} edges reference known nodes", self.graph.edges().len())
        } else {
            format!(
                "{} orphaned edge(s): {}",
                orphaned.len(),
                orphaned.join(", ")
            )
        };
        ValidationCheck::new(Self::NO_ORPHANED_EDGES, orphaned.is_empty(), details)
    }

    fn check_dependencies_resolve(&self) -> ValidationCheck {
        let known: HashSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        let mut dangling: Vec<String> = Vec::new();
        for task in self.tasks {
            let missing: BTreeSet<TaskId> = task
                .declared_dependencies()
                .filter(|dep| !known.contains(dep))
                .collect();
            if !missing.is_empty() {
                let ids = missing
                    .iter()
                    .map(|id| format!("#{id}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                dangling.push(format!("#{} -> {ids}", task.id));
            }
        }
        let details = if dangling.is_empty() {
            "all declared dependencies resolve".to_string()
        } else {
            format!(
                "{} task(s) reference unknown ids: {}",
                dangling.len(),
                dangling.join("; ")
            )
        };
        ValidationCheck::new(Self::DEPENDENCIES_RESOLVE, dangling.is_empty(), details)
    }

    fn check_self_dependencies(&self) -> ValidationCheck {
        let offenders: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| {
                task.parent_id == Some(task.id)
                    || task.declared_dependencies().any(|dep| dep == task.id)
            })
            .map(|task| format!("#{}", task.id))
            .collect();
        let details = if offenders.is_empty() {
            "no task depends on itself".to_string()
        } else {
            format!("self-referencing task(s): {}", offenders.join(", "))
        };
        ValidationCheck::new(Self::NO_SELF_DEPENDENCIES, offenders.is_empty(), details)
    }

    fn check_epics_with_children(&self) -> ValidationCheck {
        let parents: HashSet<TaskId> = self.tasks.iter().filter_map(|task| task.parent_id).collect();
        let epics = self.tasks.iter().filter(|task| task.is_epic).count();
        let with_children = self
            .tasks
            .iter()
            .filter(|task| task.is_epic && parents.contains(&task.id))
            .count();
        ValidationCheck::new(
            Self::EPICS_WITH_CHILDREN,
            true,
            format!("{with_children} of {epics} epics have children"),
        )
    }
}
