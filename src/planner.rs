use crate::calculations::{
    AcyclicAdjacency, CpmResult, CriticalPathAnalyzer, CycleDetection, Durations, ExecutionLevel,
    TopologicalSorter, analyze_scenarios, detect_cycles,
};
use crate::context::GraphContext;
use crate::error::{self, StructuralError};
use crate::graph::TaskId;
use crate::validation::{GraphValidator, ValidationReport};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub task_count: usize,
    pub edge_count: usize,
    pub failed_checks: usize,
    pub level_count: usize,
    pub critical_count: usize,
    pub project_duration: f64,
    pub critical_path: Vec<TaskId>,
}

impl PlanSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("edges={}", self.edge_count));
        if self.failed_checks > 0 {
            parts.push(format!("failed_checks={}", self.failed_checks));
        }
        parts.push(format!("levels={}", self.level_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}h", self.project_duration));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("path={chain}"));
        }
        parts.join(" ")
    }
}

/// Every artifact of one successful run. The cycle check passed, so no cycles are carried.
#[derive(Debug, Clone)]
pub struct PlanningRun {
    pub validation: ValidationReport,
    pub order: Vec<TaskId>,
    pub levels: Vec<ExecutionLevel>,
    pub cpm: CpmResult,
}

impl PlanningRun {
    pub fn summary(&self, context: &GraphContext) -> PlanSummary {
        PlanSummary {
            task_count: context.tasks().len(),
            edge_count: context.graph().edges().len(),
            failed_checks: self.validation.failed,
            level_count: self.levels.len(),
            critical_count: self.cpm.critical_count,
            project_duration: self.cpm.project_duration,
            critical_path: self.cpm.critical_path.clone(),
        }
    }
}

/// Runs the stages over one [`GraphContext`]. Each stage can also be called alone.
pub struct Planner<'a> {
    context: &'a GraphContext,
}

impl<'a> Planner<'a> {
    pub fn new(context: &'a GraphContext) -> Self {
        Self { context }
    }

    pub fn validate(&self) -> ValidationReport {
        GraphValidator::new(self.context.graph(), self.context.tasks()).validate()
    }

    pub fn detect_cycles(&self) -> CycleDetection<'a> {
        detect_cycles(self.context.adjacency())
    }

    pub fn acyclic(
        &self,
        cycles: &CycleDetection<'a>,
    ) -> Result<AcyclicAdjacency<'a>, StructuralError> {
        cycles.require_acyclic()
    }

    pub fn order(
        &self,
        acyclic: AcyclicAdjacency<'a>,
    ) -> Result<Vec<TaskId>, StructuralError> {
        TopologicalSorter::new(acyclic).sort()
    }

    pub fn levels(
        &self,
        acyclic: AcyclicAdjacency<'a>,
        order: &[TaskId],
    ) -> Result<Vec<ExecutionLevel>, StructuralError> {
        TopologicalSorter::new(acyclic).levelize(order, self.context.durations())
    }

    pub fn critical_path(
        &self,
        acyclic: AcyclicAdjacency<'a>,
        order: &[TaskId],
    ) -> Result<CpmResult, StructuralError> {
        CriticalPathAnalyzer::new(acyclic, self.context.graph())
            .analyze(order, self.context.durations())
    }

    /// CPM once per set of duration overrides, computed in parallel.
    pub fn scenarios(
        &self,
        acyclic: AcyclicAdjacency<'a>,
        order: &[TaskId],
        scenarios: &[Durations],
    ) -> Result<Vec<CpmResult>, StructuralError> {
        let analyzer = CriticalPathAnalyzer::new(acyclic, self.context.graph());
        analyze_scenarios(&analyzer, order, self.context.durations(), scenarios)
    }

    /// All stages in order. Validation failures are carried in the result; cycles
    /// and incomplete orders stop the run.
    pub fn run(&self) -> error::Result<PlanningRun> {
        self.schedule(self.validate(), &self.detect_cycles())
    }

    /// The stages after the cycle check, reusing reports the caller already has.
    pub fn schedule(
        &self,
        validation: ValidationReport,
        cycles: &CycleDetection<'a>,
    ) -> error::Result<PlanningRun> {
        let acyclic = self.acyclic(cycles)?;
        let order = self.order(acyclic)?;
        let levels = self.levels(acyclic, &order)?;
        let cpm = self.critical_path(acyclic, &order)?;

        let run = PlanningRun {
            validation,
            order,
            levels,
            cpm,
        };
        info!(summary = %run.summary(self.context).to_cli_summary(), "planning run complete");
        Ok(run)
    }
}
