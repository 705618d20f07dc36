use crate::calculations::CpmResult;
use crate::error::InputError;
use crate::graph::TaskId;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
    hours_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    #[serde(default = "WorkCalendarConfig::default_working_days")]
    working_days: Vec<Weekday>,
    #[serde(default)]
    holidays: Vec<NaiveDate>,
    #[serde(default = "WorkCalendarConfig::default_hours_per_day")]
    hours_per_day: f64,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            hours_per_day: WorkCalendarConfig::default_hours_per_day(),
        }
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn from_config(config: &WorkCalendarConfig) -> Result<Self, InputError> {
        let working_set: HashSet<Weekday> = config.working_days.iter().copied().collect();
        if working_set.is_empty() {
            return Err(InputError::Config(
                "calendar requires at least one working day".into(),
            ));
        }
        if !config.hours_per_day.is_finite() || config.hours_per_day <= 0.0 {
            return Err(InputError::Config(format!(
                "hours_per_day must be positive (got {})",
                config.hours_per_day
            )));
        }

        let non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working_set.contains(day))
            .collect();
        Ok(Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
            hours_per_day: config.hours_per_day,
        })
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    pub fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    /// Check if a date is available for scheduling
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// `from` itself when available, otherwise the next available date.
    /// `None` past the end of chrono's date range.
    pub fn first_available(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from;
        while !self.is_available(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// Find a date N available days ahead
    pub fn find_next_available(&self, from: NaiveDate, days_ahead: u64) -> Option<NaiveDate> {
        // at least one calendar day per working day
        from.checked_add_days(Days::new(days_ahead))?;

        let mut current = from;
        let mut count = 0;
        while count < days_ahead {
            current = current.succ_opt()?;
            if self.is_available(current) {
                count += 1;
            }
        }
        Some(current)
    }

    /// Working day on which the hour at `offset` (counted from `start`) falls.
    pub fn date_at_offset(
        &self,
        start: NaiveDate,
        offset_hours: f64,
    ) -> Result<NaiveDate, InputError> {
        let days = (offset_hours.max(0.0) / self.hours_per_day).floor() as u64;
        self.first_available(start)
            .and_then(|first| self.find_next_available(first, days))
            .ok_or(InputError::CalendarOverflow {
                start,
                offset_hours,
            })
    }

    /// Working day on which work ending at `offset` (counted from `start`) completes.
    pub fn finish_date_at_offset(
        &self,
        start: NaiveDate,
        offset_hours: f64,
    ) -> Result<NaiveDate, InputError> {
        let days = if offset_hours <= 0.0 {
            0
        } else {
            ((offset_hours / self.hours_per_day).ceil() as u64).saturating_sub(1)
        };
        self.first_available(start)
            .and_then(|first| self.find_next_available(first, days))
            .ok_or(InputError::CalendarOverflow {
                start,
                offset_hours,
            })
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J, hours_per_day: f64) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: working,
            holidays,
            hours_per_day,
        }
    }

    fn default_working_days() -> Vec<Weekday> {
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
    }

    fn default_hours_per_day() -> f64 {
        8.0
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day));
        Self::new(
            working,
            calendar.holidays.iter().copied(),
            calendar.hours_per_day,
        )
    }
}

/// CPM result placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedTask {
    pub id: TaskId,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub is_critical: bool,
}

/// Fails when a task would end beyond the last date chrono can represent.
pub fn project_timeline(
    cpm: &CpmResult,
    project_start: NaiveDate,
    calendar: &WorkCalendar,
) -> Result<Vec<DatedTask>, InputError> {
    cpm.nodes
        .iter()
        .map(|node| {
            let start_date = calendar.date_at_offset(project_start, node.earliest_start)?;
            let finish_date = calendar
                .finish_date_at_offset(project_start, node.earliest_finish)?
                .max(start_date);
            Ok(DatedTask {
                id: node.node.id,
                start_date,
                finish_date,
                is_critical: node.is_critical,
            })
        })
        .collect()
}
