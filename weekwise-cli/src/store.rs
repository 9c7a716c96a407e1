//! JSON file-backed repository under the weekwise home directory.
//!
//! One file per collection (`tasks.json`, `recurring.json`, `goals.json`,
//! `schedules.json`), read whole and written whole. Fine for a
//! single-user, single-process tool; swap the trait implementation if
//! that ever stops being true.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use weekwise_core::{
    RecurrenceDefinition, SavedSchedule, ScheduleRepository, ScheduleSummary, Task, WeeklyGoal,
};

use crate::state::{read_json_or_default, write_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTask {
    pub status: TaskStatus,
    pub created_at: String,
    #[serde(flatten)]
    pub task: Task,
}

pub struct FileStore {
    home: PathBuf,
}

impl FileStore {
    pub fn open(home: PathBuf) -> Self {
        Self { home }
    }

    fn tasks_path(&self) -> PathBuf {
        self.home.join("tasks.json")
    }

    fn recurring_path(&self) -> PathBuf {
        self.home.join("recurring.json")
    }

    fn goals_path(&self) -> PathBuf {
        self.home.join("goals.json")
    }

    fn schedules_path(&self) -> PathBuf {
        self.home.join("schedules.json")
    }

    pub fn load_tasks(&self) -> Result<Vec<StoredTask>> {
        read_json_or_default(&self.tasks_path())
    }

    fn save_tasks(&self, tasks: &[StoredTask]) -> Result<()> {
        write_json(&self.tasks_path(), &tasks)
    }

    /// Append a task, assigning it the next free `t-N` id. Returns the id.
    pub fn add_task(&mut self, mut task: Task) -> Result<String> {
        let mut tasks = self.load_tasks()?;
        task.id = next_id("t", tasks.iter().map(|t| t.task.id.as_str()));
        let id = task.id.clone();
        tasks.push(StoredTask {
            status: TaskStatus::Pending,
            created_at: Utc::now().to_rfc3339(),
            task,
        });
        self.save_tasks(&tasks)?;
        Ok(id)
    }

    pub fn complete_task(&mut self, id: &str) -> Result<bool> {
        let mut tasks = self.load_tasks()?;
        let mut found = false;
        for t in tasks.iter_mut() {
            if t.task.id == id && t.status == TaskStatus::Pending {
                t.status = TaskStatus::Completed;
                found = true;
            }
        }
        if found {
            self.save_tasks(&tasks)?;
        }
        Ok(found)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let mut tasks = self.load_tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.task.id != id);
        let removed = tasks.len() != before;
        if removed {
            self.save_tasks(&tasks)?;
        }
        Ok(removed)
    }

    pub fn add_recurring(&mut self, mut def: RecurrenceDefinition) -> Result<String> {
        let mut defs = self.load_recurring_definitions()?;
        def.id = next_id("r", defs.iter().map(|d| d.id.as_str()));
        let id = def.id.clone();
        defs.push(def);
        write_json(&self.recurring_path(), &defs)?;
        Ok(id)
    }

    pub fn delete_recurring(&mut self, id: &str) -> Result<bool> {
        let mut defs = self.load_recurring_definitions()?;
        let before = defs.len();
        defs.retain(|d| d.id != id);
        let removed = defs.len() != before;
        if removed {
            write_json(&self.recurring_path(), &defs)?;
        }
        Ok(removed)
    }

    pub fn add_goal(&mut self, mut goal: WeeklyGoal) -> Result<String> {
        let mut goals = self.load_goals()?;
        goal.id = next_id("g", goals.iter().map(|g| g.id.as_str()));
        let id = goal.id.clone();
        goals.push(goal);
        write_json(&self.goals_path(), &goals)?;
        Ok(id)
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<bool> {
        let mut goals = self.load_goals()?;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        let removed = goals.len() != before;
        if removed {
            write_json(&self.goals_path(), &goals)?;
        }
        Ok(removed)
    }

    fn load_saved(&self) -> Result<Vec<SavedSchedule>> {
        read_json_or_default(&self.schedules_path())
    }

    /// Assign the next free `s-N` id and persist. Returns the id.
    pub fn add_schedule(&mut self, name: &str, schedule: weekwise_core::ExportableSchedule) -> Result<String> {
        let mut saved = self.load_saved()?;
        let id = next_id("s", saved.iter().map(|s| s.id.as_str()));
        saved.push(SavedSchedule {
            id: id.clone(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
            schedule,
        });
        write_json(&self.schedules_path(), &saved)?;
        Ok(id)
    }
}

impl ScheduleRepository for FileStore {
    fn load_pending_tasks(&self) -> Result<Vec<Task>> {
        Ok(self
            .load_tasks()?
            .into_iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.task)
            .collect())
    }

    fn load_recurring_definitions(&self) -> Result<Vec<RecurrenceDefinition>> {
        read_json_or_default(&self.recurring_path())
    }

    fn load_goals(&self) -> Result<Vec<WeeklyGoal>> {
        read_json_or_default(&self.goals_path())
    }

    fn save_schedule(&mut self, schedule: SavedSchedule) -> Result<()> {
        let mut saved = self.load_saved()?;
        saved.retain(|s| s.id != schedule.id);
        saved.push(schedule);
        write_json(&self.schedules_path(), &saved)
    }

    fn load_schedule(&self, id: &str) -> Result<Option<SavedSchedule>> {
        Ok(self.load_saved()?.into_iter().find(|s| s.id == id))
    }

    fn list_schedules(&self) -> Result<Vec<ScheduleSummary>> {
        Ok(self.load_saved()?.iter().map(SavedSchedule::summary).collect())
    }

    fn delete_schedule(&mut self, id: &str) -> Result<bool> {
        let mut saved = self.load_saved()?;
        let before = saved.len();
        saved.retain(|s| s.id != id);
        let removed = saved.len() != before;
        if removed {
            write_json(&self.schedules_path(), &saved)?;
        }
        Ok(removed)
    }
}

/// Smallest `{prefix}-N` not already taken.
fn next_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let mut max = 0u64;
    for id in existing {
        if let Some(n) = id
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok())
        {
            max = max.max(n);
        }
    }
    format!("{}-{}", prefix, max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!(
            "weekwise-store-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        FileStore::open(dir)
    }

    #[test]
    fn test_task_round_trip_and_ids() {
        let mut store = temp_store("tasks");
        let a = store.add_task(Task::new("", "First")).unwrap();
        let b = store.add_task(Task::new("", "Second")).unwrap();
        assert_eq!(a, "t-1");
        assert_eq!(b, "t-2");

        let pending = store.load_pending_tasks().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].title, "First");

        assert!(store.complete_task("t-1").unwrap());
        assert_eq!(store.load_pending_tasks().unwrap().len(), 1);

        assert!(store.delete_task("t-2").unwrap());
        assert!(!store.delete_task("t-999").unwrap());
        assert!(store.load_pending_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_schedule_save_list_delete() {
        let mut store = temp_store("schedules");
        let week = weekwise_core::distribute_week(
            vec![Task::new("x", "Solo").with_duration(60)],
            chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            &weekwise_core::DistributorParams::with_default_capacity(
                weekwise_core::WorkWindow::from_hours(9, 17).unwrap(),
                15,
            ),
        )
        .unwrap();

        let id = store.add_schedule("Week 2", weekwise_core::render(&week)).unwrap();
        assert_eq!(id, "s-1");

        let list = store.list_schedules().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Week 2");
        assert_eq!(list[0].total_minutes, 60);

        let loaded = store.load_schedule(&id).unwrap().unwrap();
        assert_eq!(loaded.schedule.days.len(), 7);

        assert!(store.delete_schedule(&id).unwrap());
        assert!(store.load_schedule(&id).unwrap().is_none());
    }

    #[test]
    fn test_next_id_skips_gaps() {
        assert_eq!(next_id("t", ["t-1", "t-7", "junk"].into_iter()), "t-8");
        assert_eq!(next_id("t", std::iter::empty()), "t-1");
    }
}
