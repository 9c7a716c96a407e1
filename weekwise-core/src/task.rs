//! Task model for the scheduling engine.
//!
//! A task is immutable once handed to the scheduler for a run; edits and
//! completion live in the storage layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::SchedulerError;
use crate::time::{DayOfWeek, TimeOfDay};

/// Default block length for ad hoc tasks.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Cap applied to auto-sized durations (goal slices, hour estimates from
/// the analyzer). User-entered minutes are taken as given.
pub const MAX_AUTO_BLOCK_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

impl EnergyLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(EnergyLevel::High),
            "medium" | "med" => Some(EnergyLevel::Medium),
            "low" => Some(EnergyLevel::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
        }
    }
}

/// One unit of schedulable work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Grouping/display label; carried through, no effect on placement.
    pub category: String,

    /// Minutes.
    pub duration_minutes: u32,

    /// 1-10.
    pub urgency: i32,
    /// 1-10.
    pub importance: i32,

    pub energy: EnergyLevel,

    /// When set, the task must start at exactly this time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_time: Option<TimeOfDay>,

    /// When non-empty, the task may only land on these days.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fixed_days: BTreeSet<DayOfWeek>,

    /// Optional deadline, drives the distributor's urgency ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: "general".to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            urgency: 5,
            importance: 5,
            energy: EnergyLevel::Medium,
            fixed_time: None,
            fixed_days: BTreeSet::new(),
            due_date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_priority(mut self, urgency: i32, importance: i32) -> Self {
        self.urgency = urgency;
        self.importance = importance;
        self
    }

    pub fn with_energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_fixed_time(mut self, time: TimeOfDay) -> Self {
        self.fixed_time = Some(time);
        self
    }

    pub fn with_fixed_days(mut self, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        self.fixed_days = days.into_iter().collect();
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Combined ranking scalar, 2-20.
    pub fn priority(&self) -> i32 {
        self.urgency + self.importance
    }

    /// Reject structurally invalid tasks at the scheduler boundary.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.title.trim().is_empty() {
            return Err(SchedulerError::InvalidInput(format!(
                "task '{}' has an empty title",
                self.id
            )));
        }
        if self.duration_minutes == 0 || self.duration_minutes >= 24 * 60 {
            return Err(SchedulerError::InvalidInput(format!(
                "task '{}' has invalid duration {} min",
                self.title, self.duration_minutes
            )));
        }
        for (name, v) in [("urgency", self.urgency), ("importance", self.importance)] {
            if !(1..=10).contains(&v) {
                return Err(SchedulerError::InvalidInput(format!(
                    "task '{}' has {name} {v}, expected 1-10",
                    self.title
                )));
            }
        }
        Ok(())
    }
}

/// Clamp a 1-10 scale value coming from untrusted input.
pub fn clamp_scale(v: i32) -> i32 {
    v.clamp(1, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_defaults_and_priority() {
        let t = Task::new("t1", "Write report");
        assert_eq!(t.duration_minutes, 60);
        assert_eq!(t.priority(), 10);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let empty = Task::new("t1", "  ");
        assert!(matches!(
            empty.validate(),
            Err(SchedulerError::InvalidInput(_))
        ));

        let bad_priority = Task::new("t2", "x").with_priority(0, 5);
        assert!(bad_priority.validate().is_err());

        let bad_duration = Task::new("t3", "x").with_duration(0);
        assert!(bad_duration.validate().is_err());
    }

    #[test]
    fn test_serde_skips_empty_constraints() {
        let t = Task::new("t1", "Flexible");
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("fixed_time"));
        assert!(!json.contains("fixed_days"));
        assert!(!json.contains("due_date"));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_serde_round_trip_with_constraints() {
        let t = Task::new("t2", "Standup")
            .with_fixed_time(TimeOfDay::new(9, 0).unwrap())
            .with_fixed_days([DayOfWeek::Monday, DayOfWeek::Wednesday])
            .with_due_date(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
