use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use task_planner::calculations::{AcyclicAdjacency, CycleDetection};
use task_planner::graph::TaskDag;
use task_planner::persistence::{read_json, save_execution_order_to_csv};
use task_planner::render::to_mermaid;
use task_planner::{
    ArtifactDir, CpmResult, CyclesReport, Durations, Error, ExecutionOrderEntry, GraphContext,
    InputError, Planner, PlannerConfig, StructuralError, TaskId, ValidationReport,
    drop_closed_tasks, load_tasks_from_json, project_timeline,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PLANNER_LOG";
const SCENARIOS_ARTIFACT: &str = "critical-path-scenarios.json";

#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Dependency graph and critical-path planning")]
struct Cli {
    /// Directory the snapshot is read from and artifacts are written to
    #[arg(long, env = "PLANNER_DIR", default_value = ".", global = true)]
    dir: PathBuf,

    /// JSON settings file
    #[arg(long, env = "PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Task snapshot, relative to --dir (overrides the config file)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Drop CLOSED tasks before building the graph
    #[arg(long, global = true)]
    skip_closed: bool,

    /// Exit with status 3 when any validation check fails
    #[arg(long, global = true)]
    strict: bool,

    /// Project start date (YYYY-MM-DD); enables the calendar timeline
    #[arg(long, global = true)]
    start_date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write dependency-graph.json and adjacency-list.json
    Build,
    /// Write graph-validation.json
    Validate,
    /// Write cycles-report.json; fails when the graph has a cycle
    Cycles,
    /// Write execution-order.json and execution-order.csv
    Sort,
    /// Write execution-levels.json
    Levels,
    /// Write critical-path.json (and the timeline when a start date is set)
    Cpm {
        /// JSON array of {id: hours} override maps, analyzed in parallel
        #[arg(long)]
        scenarios: Option<PathBuf>,
    },
    /// Write a diagram of the dependency graph
    Render {
        #[arg(long, value_enum, default_value_t = DiagramFormat::Mermaid)]
        format: DiagramFormat,
    },
    /// Run every stage and write every artifact
    Run,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiagramFormat {
    Mermaid,
    Dot,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Why the process stopped early.
#[derive(Debug)]
enum Failure {
    Planner(Error),
    StrictValidation(ValidationReport),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        match self {
            Failure::Planner(Error::Structural(_)) => ExitCode::from(1),
            Failure::Planner(Error::Input(_)) => ExitCode::from(2),
            Failure::StrictValidation(_) => ExitCode::from(3),
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::Planner(err) => err.to_string(),
            Failure::StrictValidation(report) => {
                let failed = report
                    .failures()
                    .map(|check| format!("{} ({})", check.name, check.details))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!(
                    "{} of {} validation checks failed: {failed}",
                    report.failed, report.total_checks
                )
            }
        }
    }
}

impl From<InputError> for Failure {
    fn from(err: InputError) -> Self {
        Failure::Planner(Error::Input(err))
    }
}

impl From<StructuralError> for Failure {
    fn from(err: StructuralError) -> Self {
        Failure::Planner(Error::Structural(err))
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Planner(err)
    }
}

/// File settings with command-line overrides applied.
struct Settings {
    config: PlannerConfig,
    artifacts: ArtifactDir,
    input: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self, InputError> {
        let mut config = match &cli.config {
            Some(path) => PlannerConfig::load(path)?,
            None => PlannerConfig::default(),
        };
        if let Some(input) = &cli.input {
            config.input = input.clone();
        }
        config.skip_closed |= cli.skip_closed;
        config.strict |= cli.strict;
        if cli.start_date.is_some() {
            config.project_start = cli.start_date;
        }

        let artifacts = ArtifactDir::new(&cli.dir);
        let input = artifacts.path(&config.input);
        Ok(Self {
            config,
            artifacts,
            input,
        })
    }

    fn load_context(&self) -> Result<GraphContext, InputError> {
        let mut tasks = load_tasks_from_json(&self.input)?;
        if self.config.skip_closed {
            tasks = drop_closed_tasks(tasks);
        }
        info!(path = %self.input.display(), tasks = tasks.len(), "loaded task snapshot");
        GraphContext::new(tasks)
    }

    fn check_strict(&self, report: &ValidationReport) -> Result<(), Failure> {
        if self.config.strict && !report.is_clean() {
            return Err(Failure::StrictValidation(report.clone()));
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match execute(&cli) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("error: {}", failure.message());
            failure.exit_code()
        }
    }
}

fn execute(cli: &Cli) -> Result<String, Failure> {
    let settings = Settings::resolve(cli)?;
    let context = settings.load_context()?;
    let planner = Planner::new(&context);
    let artifacts = &settings.artifacts;

    match &cli.command {
        Command::Build => {
            write_graph(artifacts, &context)?;
            Ok(format!(
                "tasks={} edges={}",
                context.graph().nodes().len(),
                context.graph().edges().len()
            ))
        }
        Command::Validate => {
            let report = planner.validate();
            artifacts.write_json(ArtifactDir::GRAPH_VALIDATION, &report)?;
            settings.check_strict(&report)?;
            Ok(format!(
                "checks={} passed={} failed={}",
                report.total_checks, report.passed, report.failed
            ))
        }
        Command::Cycles => {
            gate(&planner, &context, artifacts)?;
            Ok("cycles=0".to_string())
        }
        Command::Sort => {
            let acyclic = gate(&planner, &context, artifacts)?;
            let order = planner.order(acyclic)?;
            write_order(artifacts, &order, &context)?;
            Ok(format!("ordered={}", order.len()))
        }
        Command::Levels => {
            let acyclic = gate(&planner, &context, artifacts)?;
            let order = planner.order(acyclic)?;
            let levels = planner.levels(acyclic, &order)?;
            artifacts.write_json(ArtifactDir::EXECUTION_LEVELS, &levels)?;
            let widest = levels.iter().map(|level| level.task_count).max().unwrap_or(0);
            Ok(format!("levels={} widest={widest}", levels.len()))
        }
        Command::Cpm { scenarios } => {
            let acyclic = gate(&planner, &context, artifacts)?;
            let order = planner.order(acyclic)?;
            let cpm = planner.critical_path(acyclic, &order)?;
            artifacts.write_json(ArtifactDir::CRITICAL_PATH, &cpm)?;
            write_timeline(&settings, &cpm)?;

            if let Some(path) = scenarios {
                let overrides = load_scenarios(&artifacts.path(path))?;
                let results = planner.scenarios(acyclic, &order, &overrides)?;
                artifacts.write_json(SCENARIOS_ARTIFACT, &results)?;
                info!(count = results.len(), "analyzed duration scenarios");
            }
            Ok(format!(
                "critical={} duration={}h",
                cpm.critical_count, cpm.project_duration
            ))
        }
        Command::Render { format } => {
            let path = match format {
                DiagramFormat::Mermaid => {
                    artifacts.write_text(ArtifactDir::MERMAID, &to_mermaid(context.graph()))?
                }
                DiagramFormat::Dot => artifacts
                    .write_text(ArtifactDir::DOT, &TaskDag::build(context.graph()).to_dot())?,
            };
            Ok(format!("wrote {}", path.display()))
        }
        Command::Run => {
            write_graph(artifacts, &context)?;
            let report = planner.validate();
            artifacts.write_json(ArtifactDir::GRAPH_VALIDATION, &report)?;
            settings.check_strict(&report)?;
            let cycles = write_cycles_report(&planner, &context, artifacts)?;

            let run = planner.schedule(report, &cycles)?;
            write_order(artifacts, &run.order, &context)?;
            artifacts.write_json(ArtifactDir::EXECUTION_LEVELS, &run.levels)?;
            artifacts.write_json(ArtifactDir::CRITICAL_PATH, &run.cpm)?;
            write_timeline(&settings, &run.cpm)?;
            artifacts.write_text(ArtifactDir::MERMAID, &to_mermaid(context.graph()))?;
            Ok(run.summary(&context).to_cli_summary())
        }
    }
}

fn write_cycles_report<'a>(
    planner: &Planner<'a>,
    context: &GraphContext,
    artifacts: &ArtifactDir,
) -> Result<CycleDetection<'a>, InputError> {
    let cycles = planner.detect_cycles();
    artifacts.write_json(
        ArtifactDir::CYCLES_REPORT,
        &CyclesReport::new(&cycles, context.graph()),
    )?;
    Ok(cycles)
}

/// Writes the cycles report, then refuses to continue if any cycle was found.
fn gate<'a>(
    planner: &Planner<'a>,
    context: &GraphContext,
    artifacts: &ArtifactDir,
) -> Result<AcyclicAdjacency<'a>, Failure> {
    let cycles = write_cycles_report(planner, context, artifacts)?;
    Ok(planner.acyclic(&cycles)?)
}

fn write_graph(artifacts: &ArtifactDir, context: &GraphContext) -> Result<(), InputError> {
    artifacts.write_json(ArtifactDir::DEPENDENCY_GRAPH, context.graph())?;
    artifacts.write_json(ArtifactDir::ADJACENCY_LIST, context.adjacency())?;
    Ok(())
}

fn write_order(
    artifacts: &ArtifactDir,
    order: &[TaskId],
    context: &GraphContext,
) -> Result<(), InputError> {
    let entries = ExecutionOrderEntry::from_order(order, context);
    artifacts.write_json(ArtifactDir::EXECUTION_ORDER, &entries)?;
    save_execution_order_to_csv(&entries, artifacts.path(ArtifactDir::EXECUTION_ORDER_CSV))
}

fn write_timeline(settings: &Settings, cpm: &CpmResult) -> Result<(), InputError> {
    let Some(start) = settings.config.project_start else {
        debug!("no project start date; skipping timeline");
        return Ok(());
    };
    let calendar = settings.config.work_calendar()?;
    let timeline = project_timeline(cpm, start, &calendar)?;
    settings
        .artifacts
        .write_json(ArtifactDir::SCHEDULE_TIMELINE, &timeline)?;
    Ok(())
}

fn load_scenarios(path: &Path) -> Result<Vec<Durations>, InputError> {
    let scenarios: Vec<Durations> = read_json(path)?;
    for scenario in &scenarios {
        for (id, hours) in scenario.iter() {
            if !hours.is_finite() || hours < 0.0 {
                warn!(id, hours, "rejecting scenario override");
                return Err(InputError::InvalidHours { id, hours });
            }
        }
    }
    Ok(scenarios)
}
