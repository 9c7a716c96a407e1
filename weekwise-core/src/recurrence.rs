//! Recurrence definitions and their expansion into concrete task instances.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::SchedulerError;
use crate::task::{EnergyLevel, Task};
use crate::time::{parse_day_set, DayOfWeek, TimeOfDay};

/// Hard cap on instances when the caller gives no bound.
pub const DEFAULT_MAX_OCCURRENCES: usize = 50;

/// Expansion never scans past this many calendar days, so a pattern that
/// matches nothing still terminates.
const MAX_SCAN_DAYS: usize = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekdays,
    Weekends,
    SpecificDays { days: BTreeSet<DayOfWeek> },
    /// Free-form pattern text; a day matches when its full name appears
    /// case-insensitively as a substring. Best-effort, not a rule parser.
    Custom { text: String },
}

impl RecurrencePattern {
    /// Parse a stored/hinted `(name, detail)` pair.
    ///
    /// Legacy `"weekly"` maps to `Daily`: within a one-week horizon the
    /// old weekly flag meant "include every day considered".
    pub fn parse(name: &str, detail: &str) -> Result<Self, SchedulerError> {
        match name.trim().to_lowercase().as_str() {
            "daily" | "weekly" => Ok(RecurrencePattern::Daily),
            "weekdays" => Ok(RecurrencePattern::Weekdays),
            "weekends" => Ok(RecurrencePattern::Weekends),
            "specific_days" | "days" => {
                let days = parse_day_set(detail);
                if days.is_empty() {
                    return Err(SchedulerError::InvalidInput(format!(
                        "no recognizable day names in '{detail}'"
                    )));
                }
                Ok(RecurrencePattern::SpecificDays { days })
            }
            "custom" => Ok(RecurrencePattern::Custom {
                text: detail.to_string(),
            }),
            other => Err(SchedulerError::UnknownPattern(other.to_string())),
        }
    }

    pub fn matches_date(&self, date: NaiveDate) -> bool {
        let day = DayOfWeek::from_date(date);
        match self {
            RecurrencePattern::Daily => true,
            RecurrencePattern::Weekdays => !day.is_weekend(),
            RecurrencePattern::Weekends => day.is_weekend(),
            RecurrencePattern::SpecificDays { days } => days.contains(&day),
            RecurrencePattern::Custom { text } => {
                text.to_lowercase().contains(&day.name().to_lowercase())
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            RecurrencePattern::Daily => "daily".to_string(),
            RecurrencePattern::Weekdays => "weekdays".to_string(),
            RecurrencePattern::Weekends => "weekends".to_string(),
            RecurrencePattern::SpecificDays { days } => days
                .iter()
                .map(|d| d.name())
                .collect::<Vec<_>>()
                .join(","),
            RecurrencePattern::Custom { text } => format!("custom: {text}"),
        }
    }
}

/// A recurring-task template from which concrete instances are expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceDefinition {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub category: String,
    pub urgency: i32,
    pub importance: i32,
    pub energy: EnergyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<TimeOfDay>,
    pub pattern: RecurrencePattern,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
    /// Inclusive end of the expansion range.
    pub end_date: Option<NaiveDate>,
    /// Stop after this many instances.
    pub max_occurrences: Option<usize>,
    /// When set, `Daily` patterns skip Saturday and Sunday.
    pub weekday_only_daily: bool,
}

/// Expand a definition into per-day task instances from `start` onward.
///
/// Stops at `end_date` or `max_occurrences`, whichever comes first; when
/// neither bound is given, stops after [`DEFAULT_MAX_OCCURRENCES`]
/// instances. Each instance is pinned to its day and dated as due that
/// day, so the distributor places it where the pattern said.
pub fn expand(
    def: &RecurrenceDefinition,
    start: NaiveDate,
    opts: ExpandOptions,
) -> Result<Vec<Task>, SchedulerError> {
    if let Some(end) = opts.end_date {
        if end < start {
            return Err(SchedulerError::InvalidRange { start, end });
        }
    }

    let cap = opts.max_occurrences.unwrap_or(DEFAULT_MAX_OCCURRENCES);

    let mut out = Vec::new();
    let mut date = start;

    for _ in 0..MAX_SCAN_DAYS {
        if out.len() >= cap {
            break;
        }
        if let Some(end) = opts.end_date {
            if date > end {
                break;
            }
        }

        let skip_weekend = opts.weekday_only_daily
            && matches!(def.pattern, RecurrencePattern::Daily)
            && DayOfWeek::from_date(date).is_weekend();

        if !skip_weekend && def.pattern.matches_date(date) {
            out.push(instance_for(def, date));
        }

        date = match date.checked_add_days(Days::new(1)) {
            Some(d) => d,
            None => break,
        };
    }

    Ok(out)
}

fn instance_for(def: &RecurrenceDefinition, date: NaiveDate) -> Task {
    let mut task = Task::new(format!("{}@{}", def.id, date), def.name.clone())
        .with_category(def.category.clone())
        .with_duration(def.duration_minutes)
        .with_priority(def.urgency, def.importance)
        .with_energy(def.energy)
        .with_fixed_days([DayOfWeek::from_date(date)])
        .with_due_date(date);
    if let Some(t) = def.preferred_time {
        task = task.with_fixed_time(t);
    }
    task
}
