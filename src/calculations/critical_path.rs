use super::backward_pass::BackwardPass;
use super::cycles::AcyclicAdjacency;
use super::durations::Durations;
use super::forward_pass::ForwardPass;
use super::topological::check_order;
use crate::error::StructuralError;
use crate::graph::{AdjacencyList, DependencyGraph, GraphNode, TaskId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Slack at or below this is treated as zero.
pub const SLACK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpmNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub duration: f64,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmResult {
    pub project_duration: f64,
    pub critical_count: usize,
    pub critical_path: Vec<TaskId>,
    /// In topological order.
    pub nodes: Vec<CpmNode>,
}

impl CpmResult {
    pub fn node(&self, id: TaskId) -> Option<&CpmNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    pub fn critical_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .nodes
            .iter()
            .filter(|n| n.is_critical)
            .map(|n| n.node.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

pub struct CriticalPathAnalyzer<'a> {
    adjacency: &'a AdjacencyList,
    graph: &'a DependencyGraph,
}

impl<'a> CriticalPathAnalyzer<'a> {
    pub fn new(acyclic: AcyclicAdjacency<'a>, graph: &'a DependencyGraph) -> Self {
        Self {
            adjacency: acyclic.adjacency(),
            graph,
        }
    }

    pub fn analyze(
        &self,
        order: &[TaskId],
        durations: &Durations,
    ) -> Result<CpmResult, StructuralError> {
        check_order(self.adjacency, order)?;

        let earliest = ForwardPass::new(self.adjacency, durations).execute(order);
        let project_finish = earliest
            .values()
            .map(|&(_, ef)| ef)
            .fold(0.0_f64, f64::max);
        let latest = BackwardPass::new(self.adjacency, durations).execute(order, project_finish);

        let by_id: HashMap<TaskId, &GraphNode> =
            self.graph.nodes().iter().map(|node| (node.id, node)).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for &id in order {
            let (earliest_start, earliest_finish) = earliest.get(&id).copied().unwrap_or_default();
            let (latest_start, latest_finish) = latest.get(&id).copied().unwrap_or_default();
            let mut slack = latest_start - earliest_start;
            if slack.abs() <= SLACK_EPSILON {
                slack = 0.0;
            }
            let node = by_id
                .get(&id)
                .map_or_else(|| GraphNode::placeholder(id), |&node| node.clone());
            nodes.push(CpmNode {
                node,
                duration: durations.get(id),
                earliest_start,
                earliest_finish,
                latest_start,
                latest_finish,
                slack,
                is_critical: slack == 0.0,
            });
        }

        let critical_path = self.trace_critical_path(&nodes);
        let critical_count = nodes.iter().filter(|n| n.is_critical).count();
        info!(
            project_duration = project_finish,
            critical_count,
            "critical path analysis complete"
        );
        Ok(CpmResult {
            project_duration: project_finish,
            critical_count,
            critical_path,
            nodes,
        })
    }

    /// Walks tight critical edges (successor starts exactly when the current task
    /// finishes) from the lowest-id critical source to a sink.
    fn trace_critical_path(&self, nodes: &[CpmNode]) -> Vec<TaskId> {
        let critical: HashMap<TaskId, &CpmNode> = nodes
            .iter()
            .filter(|n| n.is_critical)
            .map(|n| (n.node.id, n))
            .collect();

        let mut start: Option<&CpmNode> = critical
            .values()
            .copied()
            .filter(|n| self.adjacency.is_source(n.node.id))
            .min_by_key(|n| n.node.id);

        let mut path = Vec::new();
        while let Some(current) = start {
            path.push(current.node.id);
            start = self
                .adjacency
                .successors(current.node.id)
                .filter_map(|succ| critical.get(&succ).copied())
                .find(|succ| (succ.earliest_start - current.earliest_finish).abs() <= SLACK_EPSILON);
        }
        path
    }
}

/// Re-runs CPM once per duration scenario, in parallel. Results follow `scenarios` order.
pub fn analyze_scenarios(
    analyzer: &CriticalPathAnalyzer<'_>,
    order: &[TaskId],
    base: &Durations,
    scenarios: &[Durations],
) -> Result<Vec<CpmResult>, StructuralError> {
    scenarios
        .par_iter()
        .map(|overrides| analyzer.analyze(order, &base.with_overrides(overrides)))
        .collect()
}
