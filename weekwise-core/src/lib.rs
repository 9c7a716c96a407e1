//! weekwise-core: deadline-aware task-to-timeslot scheduling.
//!
//! The engine is a pure function of its inputs: a task pool, a date
//! horizon, and capacity parameters go in; a non-overlapping,
//! fixed-time-respecting schedule plus human-readable warnings come out.
//! Storage, the task analyzer, and exporters are external collaborators
//! reached only through the trait shapes in [`repo`] and [`analyzer`].

pub mod analyzer;
pub mod distributor;
pub mod error;
pub mod goal;
pub mod recurrence;
pub mod render;
pub mod repo;
pub mod resolver;
pub mod schedule;
pub mod task;
pub mod time;

pub use analyzer::{task_from_hints, Analysis, TaskAnalyzer, TaskHints};
pub use distributor::{distribute, distribute_week, DistributorParams};
pub use error::SchedulerError;
pub use goal::{tasks_from_goal, WeeklyGoal, MIN_SLICE_MINUTES};
pub use recurrence::{
    expand, ExpandOptions, RecurrenceDefinition, RecurrencePattern, DEFAULT_MAX_OCCURRENCES,
};
pub use render::{render, ExportDay, ExportEntry, ExportableSchedule};
pub use repo::{SavedSchedule, ScheduleRepository, ScheduleSummary};
pub use resolver::{resolve_day, DayResolution, DEFAULT_BUFFER_MINUTES};
pub use schedule::{DaySchedule, PlacedTask, WeekSchedule};
pub use task::{
    clamp_scale, EnergyLevel, Task, DEFAULT_DURATION_MINUTES, MAX_AUTO_BLOCK_MINUTES,
};
pub use time::{
    parse_day_set, resolve_local_utc, DayOfWeek, TimeOfDay, WorkWindow, MINUTES_PER_DAY,
};
