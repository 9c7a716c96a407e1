//! Schedule containers produced by the distributor and resolver.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::time::{DayOfWeek, TimeOfDay};

/// A task with its resolved start time within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTask {
    pub start: TimeOfDay,
    pub task: Task,
}

impl PlacedTask {
    pub fn start_minutes(&self) -> u32 {
        self.start.minutes_from_midnight()
    }

    /// Exclusive end, in minutes since midnight. May run past midnight for
    /// degenerate fixed-time inputs; the resolver warns in that case.
    pub fn end_minutes(&self) -> u32 {
        self.start_minutes() + self.task.duration_minutes
    }

    pub fn overlaps(&self, other: &PlacedTask) -> bool {
        self.start_minutes() < other.end_minutes() && other.start_minutes() < self.end_minutes()
    }
}

/// One resolved day: placed tasks in start order, plus warnings for
/// anything that could not be honored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day: DayOfWeek,
    pub tasks: Vec<PlacedTask>,
    pub total_minutes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            day: DayOfWeek::from_date(date),
            tasks: Vec::new(),
            total_minutes: 0,
            warnings: Vec::new(),
        }
    }
}

/// A horizon of consecutive days (1 for a daily plan, 7 for a week), plus
/// pool-level warnings for tasks that did not fit cleanly anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub start_date: NaiveDate,
    pub days: Vec<DaySchedule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl WeekSchedule {
    pub fn end_date(&self) -> NaiveDate {
        self.days.last().map(|d| d.date).unwrap_or(self.start_date)
    }

    pub fn total_minutes(&self) -> u32 {
        self.days.iter().map(|d| d.total_minutes).sum()
    }

    /// Pool warnings followed by day warnings, each prefixed with its day.
    pub fn all_warnings(&self) -> Vec<String> {
        let mut out = self.warnings.clone();
        for day in &self.days {
            for w in &day.warnings {
                out.push(format!("{}: {}", day.day.name(), w));
            }
        }
        out
    }
}
