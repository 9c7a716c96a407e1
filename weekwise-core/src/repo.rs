//! Storage boundary.
//!
//! The scheduler never opens files or databases itself; callers inject an
//! implementation of this trait. The CLI ships a JSON file store, but the
//! core depends only on these shapes.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::goal::WeeklyGoal;
use crate::recurrence::RecurrenceDefinition;
use crate::render::ExportableSchedule;
use crate::task::Task;

/// A persisted, fully rendered schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub id: String,
    pub name: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub schedule: ExportableSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub start_date: String,
    pub total_minutes: u32,
}

impl SavedSchedule {
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            start_date: self.schedule.start_date.clone(),
            total_minutes: self.schedule.days.iter().map(|d| d.total_minutes).sum(),
        }
    }
}

pub trait ScheduleRepository {
    fn load_pending_tasks(&self) -> Result<Vec<Task>>;
    fn load_recurring_definitions(&self) -> Result<Vec<RecurrenceDefinition>>;
    fn load_goals(&self) -> Result<Vec<WeeklyGoal>>;

    fn save_schedule(&mut self, schedule: SavedSchedule) -> Result<()>;
    fn load_schedule(&self, id: &str) -> Result<Option<SavedSchedule>>;
    fn list_schedules(&self) -> Result<Vec<ScheduleSummary>>;
    fn delete_schedule(&mut self, id: &str) -> Result<bool>;
}
