//! Dependency graph and critical-path scheduling for project task lists.
//!
//! A snapshot of [`TaskRecord`]s is turned into a [`GraphContext`] (graph plus
//! adjacency index), validated, gated on acyclicity, ordered, split into parallel
//! levels and run through the Critical Path Method. Every stage is a pure function
//! of the artifacts before it.

pub mod calculations;
pub mod calendar;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod planner;
pub mod render;
pub mod report;
pub mod task;
pub mod validation;

pub use calculations::{
    CpmNode, CpmResult, CriticalPathAnalyzer, CycleDetection, Durations, ExecutionLevel,
    TopologicalSorter, detect_cycles,
};
pub use calendar::{WorkCalendar, WorkCalendarConfig, project_timeline};
pub use config::PlannerConfig;
pub use context::{GraphContext, drop_closed_tasks};
pub use error::{Error, InputError, Result, StructuralError};
pub use graph::{AdjacencyList, DependencyGraph, Edge, EdgeKind, GraphBuilder, GraphNode, TaskId};
pub use persistence::{ArtifactDir, load_tasks_from_json};
pub use planner::{PlanSummary, Planner, PlanningRun};
pub use report::{CyclesReport, ExecutionOrderEntry};
pub use task::{TaskRecord, TaskState};
pub use validation::{GraphValidator, ValidationReport};
