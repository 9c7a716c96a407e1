//! Plan assembly and display: pool building, distribution, printing.

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate};

use weekwise_core::{
    distribute, render, tasks_from_goal, DayOfWeek, ExpandOptions, ExportableSchedule,
    ScheduleRepository, Task, TaskAnalyzer, WorkWindow,
};

use crate::config::Config;
use crate::store::FileStore;

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Assemble the scheduling pool for a horizon: pending tasks, expanded
/// recurring instances, and weekly-goal slices that fall inside it.
pub fn build_pool(
    store: &FileStore,
    cfg: &Config,
    start: NaiveDate,
    num_days: usize,
) -> Result<Vec<Task>> {
    let end = start
        .checked_add_days(Days::new(num_days as u64 - 1))
        .context("horizon end date out of range")?;
    let horizon_days: Vec<DayOfWeek> = (0..num_days)
        .filter_map(|i| start.checked_add_days(Days::new(i as u64)))
        .map(DayOfWeek::from_date)
        .collect();

    let mut pool = store.load_pending_tasks()?;

    for def in store.load_recurring_definitions()? {
        let instances = weekwise_core::expand(
            &def,
            start,
            ExpandOptions {
                end_date: Some(end),
                max_occurrences: None,
                weekday_only_daily: cfg.schedule.weekday_only_daily,
            },
        )?;
        pool.extend(instances);
    }

    for goal in store.load_goals()? {
        let slices = tasks_from_goal(&goal)
            .into_iter()
            .filter(|t| t.fixed_days.iter().any(|d| horizon_days.contains(d)));
        pool.extend(slices);
    }

    Ok(pool)
}

pub struct PlanRequest {
    pub start: NaiveDate,
    pub num_days: usize,
    pub hours: Option<String>,
    pub save_as: Option<String>,
    pub analyze: bool,
}

pub fn run_plan(
    store: &mut FileStore,
    cfg: &Config,
    analyzer: &dyn TaskAnalyzer,
    req: &PlanRequest,
) -> Result<()> {
    let window = match &req.hours {
        Some(h) => WorkWindow::parse_hours(h)?,
        None => cfg.schedule.work_window()?,
    };
    let params = cfg.schedule.distributor_params(window);

    let pool = build_pool(store, cfg, req.start, req.num_days)?;
    if pool.is_empty() {
        println!("Nothing to schedule. Add tasks with: weekwise task add <title>");
        return Ok(());
    }

    if req.analyze {
        let context = pool_context(&pool, req.num_days);
        let analysis = analyzer.analyze(
            "Suggest how to balance this workload across the horizon.",
            &context,
        )?;
        println!("# Analysis\n\n{}\n", analysis.text);
    }

    let week = distribute(pool, req.start, req.num_days, &params)?;
    let rendered = render(&week);
    print_schedule(&rendered);

    if let Some(name) = &req.save_as {
        let id = store.add_schedule(name, rendered)?;
        println!("\nSaved as {id} ('{name}')");
    }

    Ok(())
}

fn pool_context(pool: &[Task], num_days: usize) -> String {
    let total: u32 = pool.iter().map(|t| t.duration_minutes).sum();
    let mut lines = vec![format!(
        "{} tasks, {} min total, across {} day(s)",
        pool.len(),
        total,
        num_days
    )];
    for t in pool.iter().take(15) {
        lines.push(format!(
            "- {} ({} min, {}, priority {}/20)",
            t.title,
            t.duration_minutes,
            t.category,
            t.priority()
        ));
    }
    lines.join("\n")
}

pub fn print_schedule(s: &ExportableSchedule) {
    println!("# Schedule {} .. {}\n", s.start_date, s.end_date);

    for day in &s.days {
        println!("## {} ({})", day.day, day.date);
        if day.entries.is_empty() {
            println!("   (free)");
        } else {
            for e in &day.entries {
                println!(
                    "   {} | {} | {} | {} | priority {}",
                    e.time, e.title, e.duration_label, e.category, e.priority_label
                );
            }
            let h = day.total_minutes / 60;
            let m = day.total_minutes % 60;
            println!("   total: {h}h {m:02}m");
        }
        println!();
    }

    if !s.warnings.is_empty() {
        println!("Warnings:");
        for w in &s.warnings {
            println!("  - {w}");
        }
    }
}
