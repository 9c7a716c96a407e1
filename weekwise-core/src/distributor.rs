//! Deadline-aware distribution of a task pool across a run of days.
//!
//! The distributor only decides *which day* a task lands on; concrete slot
//! times come from the per-day resolver afterwards. It never fails the
//! whole run: anything that cannot be honored cleanly becomes a warning on
//! the produced schedule.

use chrono::{Days, NaiveDate};

use crate::error::SchedulerError;
use crate::resolver::resolve_day;
use crate::schedule::{DaySchedule, WeekSchedule};
use crate::task::{EnergyLevel, Task};
use crate::time::{DayOfWeek, WorkWindow};

/// Score band for tasks already past their deadline.
const OVERDUE_SCORE: i64 = 1000;
/// Score for deadlines beyond the current horizon.
const DISTANT_DUE_SCORE: i64 = 10;

/// Deadline placement never targets past Friday.
const LATEST_TARGET_INDEX: i64 = 4;

#[derive(Debug, Clone, Copy)]
pub struct DistributorParams {
    pub window: WorkWindow,
    pub buffer_minutes: u32,
    pub daily_capacity_minutes: u32,
}

impl DistributorParams {
    /// Capacity defaults to 80% of the work window, leaving slack for
    /// breaks and the unplanned.
    pub fn with_default_capacity(window: WorkWindow, buffer_minutes: u32) -> Self {
        Self {
            window,
            buffer_minutes,
            daily_capacity_minutes: window.len_minutes() * 4 / 5,
        }
    }
}

/// Deadline urgency relative to the scheduling start date. Overdue work
/// dominates, then sooner deadlines within the week, then distant ones;
/// tasks without a deadline rank on raw priority alone.
fn deadline_score(task: &Task, start_date: NaiveDate) -> i64 {
    let Some(due) = task.due_date else { return 0 };
    let days_until = (due - start_date).num_days();
    if days_until <= 0 {
        OVERDUE_SCORE
    } else if days_until <= 7 {
        100 - days_until
    } else {
        DISTANT_DUE_SCORE
    }
}

/// Distribute a pool over seven consecutive days starting at `start_date`.
pub fn distribute_week(
    pool: Vec<Task>,
    start_date: NaiveDate,
    params: &DistributorParams,
) -> Result<WeekSchedule, SchedulerError> {
    distribute(pool, start_date, 7, params)
}

/// Distribute a pool over `num_days` (1-7) consecutive days.
pub fn distribute(
    pool: Vec<Task>,
    start_date: NaiveDate,
    num_days: usize,
    params: &DistributorParams,
) -> Result<WeekSchedule, SchedulerError> {
    if !(1..=7).contains(&num_days) {
        return Err(SchedulerError::InvalidInput(format!(
            "horizon must be 1-7 days, got {num_days}"
        )));
    }
    for task in &pool {
        task.validate()?;
    }

    let dates: Vec<NaiveDate> = (0..num_days)
        .filter_map(|i| start_date.checked_add_days(Days::new(i as u64)))
        .collect();
    let day_names: Vec<DayOfWeek> = dates.iter().map(|d| DayOfWeek::from_date(*d)).collect();

    let mut assigned: Vec<Vec<Task>> = vec![Vec::new(); dates.len()];
    let mut running: Vec<u32> = vec![0; dates.len()];
    let mut pool_warnings: Vec<String> = Vec::new();
    let mut day_alerts: Vec<Vec<String>> = vec![Vec::new(); dates.len()];

    // Deadline urgency dominates, then raw priority, with a mild
    // preference for high-energy tasks going first. Stable sort keeps
    // input order on full ties.
    let mut ordered = pool;
    ordered.sort_by_key(|t| {
        (
            -deadline_score(t, start_date),
            -(t.priority() as i64),
            t.energy != EnergyLevel::High,
        )
    });

    for task in ordered {
        let target = pick_day(&task, start_date, &day_names, &running, params);

        match target {
            Placement::Day(i) => {
                // Deadline alerts only make sense for floating work; a
                // day-pinned instance is "due" its day by construction.
                if let Some(due) = task.due_date {
                    let days_until = (due - start_date).num_days();
                    if days_until <= 3 && task.fixed_days.is_empty() {
                        day_alerts[i].push(if days_until <= 0 {
                            format!("'{}' is overdue", task.title)
                        } else {
                            format!("'{}' due in {} day(s)", task.title, days_until)
                        });
                    }
                }
                running[i] += task.duration_minutes;
                assigned[i].push(task);
            }
            Placement::Overflow(i) => {
                let over =
                    (running[i] + task.duration_minutes).saturating_sub(params.daily_capacity_minutes);
                pool_warnings.push(format!(
                    "'{}' placed on {} beyond daily capacity ({} min over)",
                    task.title,
                    day_names[i].name(),
                    over
                ));
                running[i] += task.duration_minutes;
                assigned[i].push(task);
            }
            Placement::None => {
                pool_warnings.push(format!(
                    "'{}' has no eligible day in this horizon; left unscheduled",
                    task.title
                ));
            }
        }
    }

    let mut days = Vec::with_capacity(dates.len());
    for (i, date) in dates.iter().enumerate() {
        let resolution = resolve_day(&assigned[i], params.window, params.buffer_minutes);
        let total_minutes = resolution
            .placed
            .iter()
            .map(|p| p.task.duration_minutes)
            .sum();

        let mut warnings = day_alerts[i].clone();
        warnings.extend(resolution.warnings);

        days.push(DaySchedule {
            date: *date,
            day: day_names[i],
            tasks: resolution.placed,
            total_minutes,
            warnings,
        });
    }

    Ok(WeekSchedule {
        start_date,
        days,
        warnings: pool_warnings,
    })
}

enum Placement {
    Day(usize),
    Overflow(usize),
    None,
}

fn pick_day(
    task: &Task,
    start_date: NaiveDate,
    day_names: &[DayOfWeek],
    running: &[u32],
    params: &DistributorParams,
) -> Placement {
    let cap = params.daily_capacity_minutes;
    let fits = |i: usize| running[i] + task.duration_minutes <= cap;

    // Day-pinned tasks only ever consider their declared days.
    if !task.fixed_days.is_empty() {
        let candidates: Vec<usize> = (0..day_names.len())
            .filter(|&i| task.fixed_days.contains(&day_names[i]))
            .collect();
        if candidates.is_empty() {
            return Placement::None;
        }
        if let Some(&i) = candidates.iter().find(|&&i| fits(i)) {
            return Placement::Day(i);
        }
        let least = least_loaded(&candidates, running);
        return Placement::Overflow(least);
    }

    // Deadline-driven: aim at the due day (capped at Friday) and scan its
    // immediate neighborhood first.
    if let Some(due) = task.due_date {
        let days_until = (due - start_date).num_days();
        let target = days_until
            .clamp(0, LATEST_TARGET_INDEX)
            .min(day_names.len() as i64 - 1);
        let lo = (target - 1).max(0) as usize;
        let hi = ((target + 2) as usize).min(day_names.len());
        for i in lo..hi {
            if fits(i) {
                return Placement::Day(i);
            }
        }
    }

    // First day with room, in week order.
    if let Some(i) = (0..day_names.len()).find(|&i| fits(i)) {
        return Placement::Day(i);
    }

    // Everything full: least-loaded day takes the overflow.
    let all: Vec<usize> = (0..day_names.len()).collect();
    Placement::Overflow(least_loaded(&all, running))
}

fn least_loaded(candidates: &[usize], running: &[u32]) -> usize {
    let mut best = candidates[0];
    for &i in candidates {
        if running[i] < running[best] {
            best = i;
        }
    }
    best
}
