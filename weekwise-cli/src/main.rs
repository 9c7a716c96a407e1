use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use weekwise_core::{
    clamp_scale, parse_day_set, task_from_hints, EnergyLevel, RecurrenceDefinition,
    RecurrencePattern, ScheduleRepository, Task, TimeOfDay, WeeklyGoal,
};
use weekwise_intake::{hints_from_description, merge_hints, parse_hint_block};

mod config;
mod export;
mod llm;
mod plan;
mod state;
mod store;

use store::FileStore;

#[derive(Parser, Debug)]
#[command(name = "weekwise", version, about = "Deadline-aware day and week planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config file under ~/.weekwise
    Setup,

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Manage recurring task definitions
    Recur {
        #[command(subcommand)]
        command: RecurCommand,
    },

    /// Manage weekly goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Build a schedule for a day or a week
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// List, show, or delete saved schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Export a saved schedule to a calendar format
    Export {
        /// Saved schedule id (see: weekwise schedule list)
        id: String,

        #[arg(long, value_enum, default_value_t = ExportFormat::Ics)]
        format: ExportFormat,

        /// Output file (defaults to ~/.weekwise/exports/<id>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Push the ICS into Google Calendar via gcalcli
        #[arg(long)]
        push: bool,

        /// Target calendar name for --push
        #[arg(long)]
        calendar: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Add a task with explicit fields
    Add {
        title: String,

        #[arg(long, default_value = "general")]
        category: String,

        /// 1-10
        #[arg(long, default_value_t = 5)]
        urgency: i32,

        /// 1-10
        #[arg(long, default_value_t = 5)]
        importance: i32,

        #[arg(long, default_value_t = 60)]
        minutes: u32,

        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Pin to an exact start time, HH:MM
        #[arg(long)]
        at: Option<String>,

        /// Restrict to these days (comma-separated names)
        #[arg(long)]
        days: Option<String>,

        #[arg(long, value_enum, default_value_t = EnergyArg::Medium)]
        energy: EnergyArg,
    },

    /// Add a task from a natural-language description
    AddNl {
        /// e.g. "Team meeting Friday at 2:00 PM about Q4 planning"
        description: String,
    },

    /// List pending tasks
    List,

    /// Mark a task completed
    Done { id: String },

    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum RecurCommand {
    /// Add a recurring task definition
    Add {
        name: String,

        /// daily | weekdays | weekends | days:<mon,fri,...> | custom:<text>
        #[arg(long)]
        pattern: String,

        #[arg(long, default_value_t = 30)]
        minutes: u32,

        /// Preferred start time, HH:MM
        #[arg(long)]
        at: Option<String>,

        #[arg(long, default_value = "general")]
        category: String,

        #[arg(long, default_value_t = 5)]
        urgency: i32,

        #[arg(long, default_value_t = 5)]
        importance: i32,

        #[arg(long, value_enum, default_value_t = EnergyArg::Medium)]
        energy: EnergyArg,
    },

    /// List recurring definitions
    List,

    /// Delete a recurring definition
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Add a weekly goal whose hours get spread across its days
    Add {
        title: String,

        /// Total hours to spend this week
        #[arg(long)]
        hours: f32,

        #[arg(long, default_value = "general")]
        category: String,

        #[arg(long, default_value_t = 5)]
        urgency: i32,

        #[arg(long, default_value_t = 5)]
        importance: i32,

        /// Days to spread over (comma-separated; default Mon-Fri)
        #[arg(long)]
        days: Option<String>,

        /// Preferred start time, HH:MM
        #[arg(long)]
        at: Option<String>,

        #[arg(long, value_enum, default_value_t = EnergyArg::Medium)]
        energy: EnergyArg,
    },

    /// List weekly goals
    List,

    /// Delete a weekly goal
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Schedule one day
    Day {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Work hours, e.g. 9-17 (default from config)
        #[arg(long)]
        hours: Option<String>,

        /// Save the result under this name
        #[arg(long)]
        save: Option<String>,

        /// Ask the analyzer for advice before scheduling
        #[arg(long)]
        analyze: bool,
    },

    /// Schedule a full week (Monday through Sunday)
    Week {
        /// Week start, YYYY-MM-DD (default: this Monday)
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        hours: Option<String>,

        #[arg(long)]
        save: Option<String>,

        #[arg(long)]
        analyze: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    List,
    Show { id: String },
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Ics,
    Html,
    Text,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Ics => "ics",
            ExportFormat::Html => "html",
            ExportFormat::Text => "text",
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EnergyArg {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for EnergyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EnergyArg::High => "high",
            EnergyArg::Medium => "medium",
            EnergyArg::Low => "low",
        })
    }
}

impl From<EnergyArg> for EnergyLevel {
    fn from(e: EnergyArg) -> Self {
        match e {
            EnergyArg::High => EnergyLevel::High,
            EnergyArg::Medium => EnergyLevel::Medium,
            EnergyArg::Low => EnergyLevel::Low,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let mut store = FileStore::open(state::ensure_weekwise_home()?);

    match cli.command {
        Command::Setup => {
            config::init_config()?;
        }

        Command::Task { command } => run_task(&mut store, &cfg, command)?,
        Command::Recur { command } => run_recur(&mut store, command)?,
        Command::Goal { command } => run_goal(&mut store, command)?,

        Command::Plan { command } => {
            let analyzer = llm::default_analyzer(&cfg.llm);
            let req = match command {
                PlanCommand::Day {
                    date,
                    hours,
                    save,
                    analyze,
                } => plan::PlanRequest {
                    start: parse_date_or(date.as_deref(), Local::now().date_naive())?,
                    num_days: 1,
                    hours,
                    save_as: save,
                    analyze,
                },
                PlanCommand::Week {
                    start,
                    hours,
                    save,
                    analyze,
                } => plan::PlanRequest {
                    start: parse_date_or(
                        start.as_deref(),
                        plan::monday_of(Local::now().date_naive()),
                    )?,
                    num_days: 7,
                    hours,
                    save_as: save,
                    analyze,
                },
            };
            plan::run_plan(&mut store, &cfg, analyzer.as_ref(), &req)?;
        }

        Command::Schedule { command } => run_schedule(&mut store, command)?,

        Command::Export {
            id,
            format,
            out,
            push,
            calendar,
        } => run_export(&store, &cfg, &id, format, out, push, calendar.as_deref())?,
    }

    Ok(())
}

fn run_task(store: &mut FileStore, cfg: &config::Config, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            category,
            urgency,
            importance,
            minutes,
            due,
            at,
            days,
            energy,
        } => {
            let mut task = Task::new("", title)
                .with_category(category)
                .with_duration(minutes)
                .with_priority(clamp_scale(urgency), clamp_scale(importance))
                .with_energy(energy.into());

            if let Some(d) = due {
                task = task.with_due_date(parse_date(&d)?);
            }
            if let Some(t) = at {
                task = task.with_fixed_time(TimeOfDay::parse(&t)?);
            }
            if let Some(d) = days {
                let set = parse_day_set(&d);
                if set.is_empty() {
                    bail!("no recognizable day names in '{d}'");
                }
                task = task.with_fixed_days(set);
            }
            task.validate()?;

            let id = store.add_task(task)?;
            println!("Added {id}");
        }

        TaskCommand::AddNl { description } => {
            let analyzer = llm::default_analyzer(&cfg.llm);
            let analysis = analyzer.analyze(&description, "")?;

            let deterministic = hints_from_description(&description);
            let hints = match analysis.hints.or_else(|| parse_hint_block(&analysis.text)) {
                Some(h) => merge_hints(h, deterministic),
                None => deterministic,
            };

            if hints.recurring == Some(true) {
                println!(
                    "This looks recurring ({}). Use: weekwise recur add",
                    hints.recurrence_pattern.as_deref().unwrap_or("pattern unclear")
                );
            }

            let task = task_from_hints("", &description, &hints);
            task.validate()?;
            let summary = format!(
                "{} | {} min | {} | priority {}/20",
                task.title,
                task.duration_minutes,
                task.category,
                task.priority()
            );
            let id = store.add_task(task)?;
            println!("Added {id}: {summary}");
        }

        TaskCommand::List => {
            let tasks = store.load_pending_tasks()?;
            if tasks.is_empty() {
                println!("No pending tasks.");
            }
            for t in tasks {
                let mut extras = Vec::new();
                if let Some(d) = t.due_date {
                    extras.push(format!("due {d}"));
                }
                if let Some(at) = t.fixed_time {
                    extras.push(format!("at {at}"));
                }
                if !t.fixed_days.is_empty() {
                    extras.push(
                        t.fixed_days
                            .iter()
                            .map(|d| d.name())
                            .collect::<Vec<_>>()
                            .join("/"),
                    );
                }
                let extras = if extras.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", extras.join(", "))
                };
                println!(
                    "[{}] {} | {} min | {} | priority {}/20{}",
                    t.id,
                    t.title,
                    t.duration_minutes,
                    t.category,
                    t.priority(),
                    extras
                );
            }
        }

        TaskCommand::Done { id } => {
            if store.complete_task(&id)? {
                println!("Completed {id}");
            } else {
                bail!("no pending task with id {id}");
            }
        }

        TaskCommand::Delete { id } => {
            if store.delete_task(&id)? {
                println!("Deleted {id}");
            } else {
                bail!("no task with id {id}");
            }
        }
    }
    Ok(())
}

fn run_recur(store: &mut FileStore, command: RecurCommand) -> Result<()> {
    match command {
        RecurCommand::Add {
            name,
            pattern,
            minutes,
            at,
            category,
            urgency,
            importance,
            energy,
        } => {
            let parsed = parse_pattern_arg(&pattern)?;
            let def = RecurrenceDefinition {
                id: String::new(),
                name,
                duration_minutes: minutes,
                category,
                urgency: clamp_scale(urgency),
                importance: clamp_scale(importance),
                energy: energy.into(),
                preferred_time: at.as_deref().map(TimeOfDay::parse).transpose()?,
                pattern: parsed,
            };
            let id = store.add_recurring(def)?;
            println!("Added {id}");
        }

        RecurCommand::List => {
            let defs = store.load_recurring_definitions()?;
            if defs.is_empty() {
                println!("No recurring tasks.");
            }
            for d in defs {
                let time = d
                    .preferred_time
                    .map(|t| format!(" at {t}"))
                    .unwrap_or_else(|| " (flexible time)".to_string());
                println!(
                    "[{}] {} | {} | {} min{} | {}",
                    d.id,
                    d.name,
                    d.pattern.label(),
                    d.duration_minutes,
                    time,
                    d.category
                );
            }
        }

        RecurCommand::Delete { id } => {
            if store.delete_recurring(&id)? {
                println!("Deleted {id}");
            } else {
                bail!("no recurring task with id {id}");
            }
        }
    }
    Ok(())
}

fn run_goal(store: &mut FileStore, command: GoalCommand) -> Result<()> {
    match command {
        GoalCommand::Add {
            title,
            hours,
            category,
            urgency,
            importance,
            days,
            at,
            energy,
        } => {
            if !(hours > 0.0 && hours < 80.0) {
                bail!("hours must be between 0 and 80");
            }
            let goal = WeeklyGoal {
                id: String::new(),
                title,
                category,
                estimated_minutes: (hours * 60.0).round() as u32,
                urgency: clamp_scale(urgency),
                importance: clamp_scale(importance),
                energy: energy.into(),
                preferred_days: days.as_deref().map(parse_day_set).unwrap_or_default(),
                preferred_time: at.as_deref().map(TimeOfDay::parse).transpose()?,
            };
            let id = store.add_goal(goal)?;
            println!("Added {id}");
        }

        GoalCommand::List => {
            let goals = store.load_goals()?;
            if goals.is_empty() {
                println!("No weekly goals.");
            }
            for g in goals {
                let days = if g.preferred_days.is_empty() {
                    "Mon-Fri".to_string()
                } else {
                    g.preferred_days
                        .iter()
                        .map(|d| d.name())
                        .collect::<Vec<_>>()
                        .join("/")
                };
                println!(
                    "[{}] {} | {:.1}h over {} | {}",
                    g.id,
                    g.title,
                    g.estimated_minutes as f32 / 60.0,
                    days,
                    g.category
                );
            }
        }

        GoalCommand::Delete { id } => {
            if store.delete_goal(&id)? {
                println!("Deleted {id}");
            } else {
                bail!("no goal with id {id}");
            }
        }
    }
    Ok(())
}

fn run_schedule(store: &mut FileStore, command: ScheduleCommand) -> Result<()> {
    match command {
        ScheduleCommand::List => {
            let summaries = store.list_schedules()?;
            if summaries.is_empty() {
                println!("No saved schedules.");
            }
            for s in summaries {
                println!(
                    "[{}] {} | starts {} | {}h {:02}m | created {}",
                    s.id,
                    s.name,
                    s.start_date,
                    s.total_minutes / 60,
                    s.total_minutes % 60,
                    s.created_at
                );
            }
        }

        ScheduleCommand::Show { id } => {
            let saved = store
                .load_schedule(&id)?
                .with_context(|| format!("no saved schedule with id {id}"))?;
            println!("{} ({})\n", saved.name, saved.created_at);
            plan::print_schedule(&saved.schedule);
        }

        ScheduleCommand::Delete { id } => {
            if store.delete_schedule(&id)? {
                println!("Deleted {id}");
            } else {
                bail!("no saved schedule with id {id}");
            }
        }
    }
    Ok(())
}

fn run_export(
    store: &FileStore,
    cfg: &config::Config,
    id: &str,
    format: ExportFormat,
    out: Option<PathBuf>,
    push: bool,
    calendar: Option<&str>,
) -> Result<()> {
    let saved = store
        .load_schedule(id)?
        .with_context(|| format!("no saved schedule with id {id}"))?;

    let (content, ext) = match format {
        ExportFormat::Ics => {
            let events = export::events_from_schedule(&saved.schedule, &cfg.schedule.timezone)?;
            (export::events_to_ics(&events, &saved.id), "ics")
        }
        ExportFormat::Html => (export::schedule_to_html(&saved.schedule, &saved.name), "html"),
        ExportFormat::Text => (export::schedule_to_text(&saved.schedule, &saved.name), "txt"),
    };

    let path = match out {
        Some(p) => p,
        None => state::exports_dir()?.join(format!("{}.{}", saved.id, ext)),
    };
    std::fs::write(&path, &content).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());

    if push {
        if !matches!(format, ExportFormat::Ics) {
            bail!("--push only works with --format ics");
        }
        export::push_ics_via_gcalcli(&content, calendar)?;
        println!("Imported into Google Calendar");
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn parse_date_or(s: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(default),
    }
}

/// CLI pattern syntax: `daily`, `weekdays`, `weekends`,
/// `days:mon,wed,fri`, `custom:<free text>`.
fn parse_pattern_arg(s: &str) -> Result<RecurrencePattern> {
    let (name, detail) = match s.split_once(':') {
        Some((n, d)) => (n, d),
        None => (s, ""),
    };
    Ok(RecurrencePattern::parse(name, detail)?)
}
