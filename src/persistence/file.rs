use super::PersistenceResult;
use crate::error::InputError;
use crate::report::ExecutionOrderEntry;
use crate::task::TaskRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> PersistenceResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed with a trailing newline, so reruns on the same input are byte-identical.
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> PersistenceResult<()> {
    let path = path.as_ref();
    let mut body = serde_json::to_string_pretty(value).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    body.push('\n');
    fs::write(path, body).map_err(|source| InputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRecord>> {
    let tasks: Vec<TaskRecord> = read_json(path)?;
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

#[derive(Serialize)]
struct ExecutionOrderCsvRecord {
    order: usize,
    id: u64,
    title: String,
    priority: String,
    estimated_hours: f64,
    depends_on: String,
    blocks: String,
}

impl From<&ExecutionOrderEntry> for ExecutionOrderCsvRecord {
    fn from(entry: &ExecutionOrderEntry) -> Self {
        Self {
            order: entry.order,
            id: entry.id,
            title: entry.title.clone(),
            priority: entry.priority.clone(),
            estimated_hours: entry.estimated_hours,
            depends_on: join_ids(&entry.depends_on),
            blocks: join_ids(&entry.blocks),
        }
    }
}

fn join_ids(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

pub fn save_execution_order_to_csv<P: AsRef<Path>>(
    entries: &[ExecutionOrderEntry],
    path: P,
) -> PersistenceResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| InputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in entries {
        writer.serialize(ExecutionOrderCsvRecord::from(entry))?;
    }
    writer.flush().map_err(|source| InputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Working directory that stage inputs are read from and artifacts written to.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub const DEPENDENCY_GRAPH: &'static str = "dependency-graph.json";
    pub const ADJACENCY_LIST: &'static str = "adjacency-list.json";
    pub const CYCLES_REPORT: &'static str = "cycles-report.json";
    pub const EXECUTION_ORDER: &'static str = "execution-order.json";
    pub const EXECUTION_ORDER_CSV: &'static str = "execution-order.csv";
    pub const EXECUTION_LEVELS: &'static str = "execution-levels.json";
    pub const GRAPH_VALIDATION: &'static str = "graph-validation.json";
    pub const CRITICAL_PATH: &'static str = "critical-path.json";
    pub const SCHEDULE_TIMELINE: &'static str = "schedule-timeline.json";
    pub const MERMAID: &'static str = "dependency-graph.mmd";
    pub const DOT: &'static str = "dependency-graph.dot";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> PersistenceResult<PathBuf> {
        let path = self.path(name);
        write_json(&path, value)?;
        Ok(path)
    }

    pub fn write_text(&self, name: &str, body: &str) -> PersistenceResult<PathBuf> {
        let path = self.path(name);
        let mut file = File::create(&path).map_err(|source| InputError::Write {
            path: path.clone(),
            source,
        })?;
        file.write_all(body.as_bytes())
            .map_err(|source| InputError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
