//! Task analyzer boundary.
//!
//! The analyzer is an external collaborator (an LLM behind an HTTP call,
//! or nothing at all). The core only depends on this shape: free-form
//! advisory text plus optional structured hints. Hints are seeds for task
//! construction; absent or malformed fields fall back to defaults and
//! never fail the run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{clamp_scale, EnergyLevel, Task, DEFAULT_DURATION_MINUTES, MAX_AUTO_BLOCK_MINUTES};
use crate::time::TimeOfDay;

/// Structured hints an analyzer may return. Every field is optional and
/// independently ignorable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskHints {
    pub title: Option<String>,
    pub category: Option<String>,
    pub urgency: Option<i32>,
    pub importance: Option<i32>,
    pub estimated_minutes: Option<u32>,
    /// "YYYY-MM-DD"; ignored when unparseable.
    pub due_date: Option<String>,
    /// "HH:MM"; ignored when unparseable.
    pub due_time: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
    pub energy: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Free-form advisory text, shown to the user verbatim.
    pub text: String,
    pub hints: Option<TaskHints>,
}

pub trait TaskAnalyzer {
    fn analyze(&self, description: &str, context: &str) -> anyhow::Result<Analysis>;
}

/// Build a task from hints, tolerating partial or garbage values.
///
/// `fallback_title` is used when the hints carry no usable title.
pub fn task_from_hints(id: impl Into<String>, fallback_title: &str, hints: &TaskHints) -> Task {
    let title = hints
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback_title);

    let mut task = Task::new(id, title)
        .with_duration(
            hints
                .estimated_minutes
                .filter(|&m| m > 0)
                .map(|m| m.min(MAX_AUTO_BLOCK_MINUTES))
                .unwrap_or(DEFAULT_DURATION_MINUTES),
        )
        .with_priority(
            clamp_scale(hints.urgency.unwrap_or(5)),
            clamp_scale(hints.importance.unwrap_or(5)),
        );

    if let Some(cat) = hints.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        task = task.with_category(cat);
    }
    if let Some(e) = hints.energy.as_deref().and_then(EnergyLevel::parse) {
        task = task.with_energy(e);
    }
    if let Some(date) = hints
        .due_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    {
        task = task.with_due_date(date);
    }
    if let Some(time) = hints.due_time.as_deref().and_then(|s| TimeOfDay::parse(s).ok()) {
        task = task.with_fixed_time(time);
    }

    task
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hints_yield_defaults() {
        let t = task_from_hints("t1", "Budget review", &TaskHints::default());
        assert_eq!(t.title, "Budget review");
        assert_eq!(t.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert_eq!(t.priority(), 10);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_hints_applied_and_clamped() {
        let hints = TaskHints {
            title: Some("Quarterly report".to_string()),
            category: Some("work".to_string()),
            urgency: Some(14),
            importance: Some(-2),
            estimated_minutes: Some(600),
            due_date: Some("2025-01-08".to_string()),
            due_time: Some("14:00".to_string()),
            energy: Some("HIGH".to_string()),
            ..Default::default()
        };
        let t = task_from_hints("t1", "fallback", &hints);
        assert_eq!(t.title, "Quarterly report");
        assert_eq!(t.urgency, 10);
        assert_eq!(t.importance, 1);
        assert_eq!(t.duration_minutes, MAX_AUTO_BLOCK_MINUTES);
        assert_eq!(t.due_date, Some(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
        assert_eq!(t.fixed_time, Some(TimeOfDay::new(14, 0).unwrap()));
        assert_eq!(t.energy, EnergyLevel::High);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_garbage_fields_ignored() {
        let hints = TaskHints {
            due_date: Some("next tuesday".to_string()),
            due_time: Some("2pm-ish".to_string()),
            energy: Some("over 9000".to_string()),
            ..Default::default()
        };
        let t = task_from_hints("t1", "Thing", &hints);
        assert_eq!(t.due_date, None);
        assert_eq!(t.fixed_time, None);
        assert_eq!(t.energy, EnergyLevel::Medium);
    }
}
