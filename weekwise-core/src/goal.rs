//! Weekly goals: aggregate hours split into per-day work slices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::task::{EnergyLevel, Task, MAX_AUTO_BLOCK_MINUTES};
use crate::time::{DayOfWeek, TimeOfDay};

/// Slices shorter than this are dropped rather than scheduled.
pub const MIN_SLICE_MINUTES: u32 = 30;

/// A standing goal for the week, e.g. "6 hours on the thesis".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Total minutes to spend across the week.
    pub estimated_minutes: u32,
    pub urgency: i32,
    pub importance: i32,
    pub energy: EnergyLevel,
    /// Days to spread the work over; empty means Monday-Friday.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub preferred_days: BTreeSet<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<TimeOfDay>,
}

impl WeeklyGoal {
    pub fn eligible_days(&self) -> Vec<DayOfWeek> {
        if self.preferred_days.is_empty() {
            DayOfWeek::ALL[..5].to_vec()
        } else {
            self.preferred_days.iter().copied().collect()
        }
    }
}

/// Divide a goal's total time evenly across its eligible days.
///
/// Slices under [`MIN_SLICE_MINUTES`] are dropped; each slice is capped at
/// [`MAX_AUTO_BLOCK_MINUTES`]. Each emitted task is pinned to its day, and
/// to the goal's preferred time when one is set.
pub fn tasks_from_goal(goal: &WeeklyGoal) -> Vec<Task> {
    let days = goal.eligible_days();
    if days.is_empty() || goal.estimated_minutes == 0 {
        return Vec::new();
    }

    let per_day = goal.estimated_minutes / days.len() as u32;
    if per_day < MIN_SLICE_MINUTES {
        return Vec::new();
    }
    let per_day = per_day.min(MAX_AUTO_BLOCK_MINUTES);

    days.into_iter()
        .map(|day| {
            let mut task = Task::new(
                format!("{}@{}", goal.id, day.name().to_lowercase()),
                format!("Work on: {}", goal.title),
            )
            .with_category(goal.category.clone())
            .with_duration(per_day)
            .with_priority(goal.urgency, goal.importance)
            .with_energy(goal.energy)
            .with_fixed_days([day]);
            if let Some(t) = goal.preferred_time {
                task = task.with_fixed_time(t);
            }
            task
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(minutes: u32, days: &[DayOfWeek]) -> WeeklyGoal {
        WeeklyGoal {
            id: "g1".to_string(),
            title: "Thesis writing".to_string(),
            category: "learning".to_string(),
            estimated_minutes: minutes,
            urgency: 6,
            importance: 8,
            energy: EnergyLevel::High,
            preferred_days: days.iter().copied().collect(),
            preferred_time: None,
        }
    }

    #[test]
    fn test_splits_across_default_weekdays() {
        let tasks = tasks_from_goal(&goal(5 * 60, &[]));
        assert_eq!(tasks.len(), 5);
        assert!(tasks.iter().all(|t| t.duration_minutes == 60));
        assert!(tasks.iter().all(|t| t.title.starts_with("Work on:")));
    }

    #[test]
    fn test_respects_preferred_days() {
        let tasks = tasks_from_goal(&goal(120, &[DayOfWeek::Tuesday, DayOfWeek::Thursday]));
        assert_eq!(tasks.len(), 2);
        assert_eq!(
            tasks[0].fixed_days.iter().next(),
            Some(&DayOfWeek::Tuesday)
        );
    }

    #[test]
    fn test_drops_sub_half_hour_slices() {
        // 100 minutes over 5 days = 20 min/day, under the floor.
        assert!(tasks_from_goal(&goal(100, &[])).is_empty());
    }

    #[test]
    fn test_caps_oversized_slices() {
        let tasks = tasks_from_goal(&goal(20 * 60, &[DayOfWeek::Saturday]));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].duration_minutes, MAX_AUTO_BLOCK_MINUTES);
    }
}
