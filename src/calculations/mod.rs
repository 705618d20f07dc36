pub mod backward_pass;
pub mod critical_path;
pub mod cycles;
pub mod durations;
pub mod forward_pass;
pub mod topological;

pub use critical_path::{CpmNode, CpmResult, CriticalPathAnalyzer, analyze_scenarios};
pub use cycles::{AcyclicAdjacency, Cycle, CycleDetection, CycleDetector, detect_cycles};
pub use durations::Durations;
pub use topological::{ExecutionLevel, TopologicalSorter};
