//! Flatten a resolved schedule into the exporter-facing shape.
//!
//! Pure transformation: no scheduling decisions happen here, it only
//! decouples internal time types from whatever formatter consumes the
//! result (ICS, HTML, plain text, storage).

use serde::{Deserialize, Serialize};

use crate::schedule::WeekSchedule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// "HH:MM" start time.
    pub time: String,
    pub title: String,
    pub duration_minutes: u32,
    pub duration_label: String,
    pub category: String,
    pub priority: i32,
    pub priority_label: String,
    pub energy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDay {
    /// Weekday name, "Monday".."Sunday".
    pub day: String,
    /// ISO date, "YYYY-MM-DD".
    pub date: String,
    pub entries: Vec<ExportEntry>,
    pub total_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableSchedule {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<ExportDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Render a schedule into its exportable form. Pure and deterministic:
/// the same schedule always yields the same output.
pub fn render(week: &WeekSchedule) -> ExportableSchedule {
    let days = week
        .days
        .iter()
        .map(|day| ExportDay {
            day: day.day.name().to_string(),
            date: day.date.format("%Y-%m-%d").to_string(),
            entries: day
                .tasks
                .iter()
                .map(|p| ExportEntry {
                    time: p.start.to_string(),
                    title: p.task.title.clone(),
                    duration_minutes: p.task.duration_minutes,
                    duration_label: duration_label(p.task.duration_minutes),
                    category: p.task.category.clone(),
                    priority: p.task.priority(),
                    priority_label: format!("{}/20", p.task.priority()),
                    energy: p.task.energy.label().to_string(),
                })
                .collect(),
            total_minutes: day.total_minutes,
        })
        .collect();

    ExportableSchedule {
        start_date: week.start_date.format("%Y-%m-%d").to_string(),
        end_date: week.end_date().format("%Y-%m-%d").to_string(),
        days,
        warnings: week.all_warnings(),
    }
}

pub fn duration_label(minutes: u32) -> String {
    if minutes >= 60 && minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else if minutes > 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{} min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributor::{distribute_week, DistributorParams};
    use crate::task::Task;
    use crate::time::WorkWindow;
    use chrono::NaiveDate;

    #[test]
    fn test_duration_labels() {
        assert_eq!(duration_label(45), "45 min");
        assert_eq!(duration_label(60), "1h");
        assert_eq!(duration_label(90), "1h 30m");
        assert_eq!(duration_label(120), "2h");
    }

    #[test]
    fn test_render_is_pure() {
        let pool = vec![
            Task::new("a", "Write report").with_duration(90).with_priority(8, 8),
            Task::new("b", "Email sweep").with_duration(30),
        ];
        let params = DistributorParams::with_default_capacity(
            WorkWindow::from_hours(9, 17).unwrap(),
            15,
        );
        let week =
            distribute_week(pool, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), &params).unwrap();

        let first = render(&week);
        let second = render(&week);
        assert_eq!(first, second);

        assert_eq!(first.days.len(), 7);
        assert_eq!(first.days[0].day, "Monday");
        assert_eq!(first.start_date, "2025-01-06");
        assert_eq!(first.end_date, "2025-01-12");

        let entry = &first.days[0].entries[0];
        assert_eq!(entry.time, "09:00");
        assert_eq!(entry.title, "Write report");
        assert_eq!(entry.priority_label, "16/20");
        assert_eq!(entry.duration_label, "1h 30m");
    }
}
