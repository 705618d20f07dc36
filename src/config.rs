use crate::calendar::{WorkCalendar, WorkCalendarConfig};
use crate::error::InputError;
use crate::persistence::read_json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run settings, read from an optional JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Task snapshot, relative to the working directory.
    pub input: PathBuf,
    /// Drop CLOSED tasks (and references to them) before building the graph.
    pub skip_closed: bool,
    /// Treat failed validation checks as fatal.
    pub strict: bool,
    pub project_start: Option<NaiveDate>,
    pub calendar: Option<WorkCalendarConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("tasks.json"),
            skip_closed: false,
            strict: false,
            project_start: None,
            calendar: None,
        }
    }
}

impl PlannerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        read_json(path)
    }

    pub fn work_calendar(&self) -> Result<WorkCalendar, InputError> {
        match &self.calendar {
            Some(config) => WorkCalendar::from_config(config),
            None => Ok(WorkCalendar::default()),
        }
    }
}
