//! End-to-end pipeline checks: pool -> distributor -> resolver -> renderer.

use chrono::NaiveDate;
use weekwise_core::{
    distribute, distribute_week, expand, render, tasks_from_goal, DayOfWeek, DistributorParams,
    EnergyLevel, ExpandOptions, RecurrenceDefinition, RecurrencePattern, Task, TimeOfDay,
    WeeklyGoal, WorkWindow,
};

fn monday() -> NaiveDate {
    // 2025-01-06 is a Monday.
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn params() -> DistributorParams {
    DistributorParams {
        window: WorkWindow::from_hours(9, 17).unwrap(),
        buffer_minutes: 15,
        daily_capacity_minutes: 480,
    }
}

#[test]
fn day_plan_places_flexible_around_fixed() {
    let standup = Task::new("s", "Standup")
        .with_duration(30)
        .with_fixed_time(TimeOfDay::new(11, 0).unwrap());
    let a = Task::new("a", "Deep work").with_duration(90).with_priority(9, 9);
    let b = Task::new("b", "Email sweep").with_duration(60).with_priority(5, 5);

    let plan = distribute(vec![standup, a, b], monday(), 1, &params()).unwrap();
    let day = &plan.days[0];

    let slots: Vec<(String, &str)> = day
        .tasks
        .iter()
        .map(|p| (p.start.to_string(), p.task.title.as_str()))
        .collect();

    assert_eq!(
        slots,
        vec![
            ("09:00".to_string(), "Deep work"),
            ("11:00".to_string(), "Standup"),
            ("11:45".to_string(), "Email sweep"),
        ]
    );
}

#[test]
fn recurring_standup_lands_every_weekday_morning() {
    let def = RecurrenceDefinition {
        id: "r1".to_string(),
        name: "Standup".to_string(),
        duration_minutes: 15,
        category: "work".to_string(),
        urgency: 5,
        importance: 5,
        energy: EnergyLevel::Medium,
        preferred_time: Some(TimeOfDay::new(9, 0).unwrap()),
        pattern: RecurrencePattern::Weekdays,
    };
    let instances = expand(
        &def,
        monday(),
        ExpandOptions {
            end_date: NaiveDate::from_ymd_opt(2025, 1, 12),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(instances.len(), 5);

    let week = distribute_week(instances, monday(), &params()).unwrap();

    for (i, day) in week.days.iter().enumerate() {
        if i < 5 {
            assert_eq!(day.tasks.len(), 1, "{} should host one standup", day.day.name());
            assert_eq!(day.tasks[0].start, TimeOfDay::new(9, 0).unwrap());
        } else {
            assert!(day.tasks.is_empty(), "{} should stay free", day.day.name());
        }
    }
}

#[test]
fn goal_hours_spread_and_schedule_cleanly() {
    let goal = WeeklyGoal {
        id: "g1".to_string(),
        title: "Portfolio site".to_string(),
        category: "personal".to_string(),
        estimated_minutes: 5 * 60,
        urgency: 4,
        importance: 7,
        energy: EnergyLevel::Medium,
        preferred_days: Default::default(),
        preferred_time: None,
    };

    let week = distribute_week(tasks_from_goal(&goal), monday(), &params()).unwrap();

    let busy_days = week.days.iter().filter(|d| !d.tasks.is_empty()).count();
    assert_eq!(busy_days, 5);
    assert_eq!(week.total_minutes(), 5 * 60);
    assert!(week.all_warnings().is_empty());
}

#[test]
fn double_booked_fixed_times_survive_with_warning() {
    let call = Task::new("a", "Client call")
        .with_duration(60)
        .with_fixed_time(TimeOfDay::new(14, 0).unwrap());
    let review = Task::new("b", "Design review")
        .with_duration(30)
        .with_fixed_time(TimeOfDay::new(14, 0).unwrap());

    let plan = distribute(vec![call, review], monday(), 1, &params()).unwrap();
    let day = &plan.days[0];

    assert_eq!(day.tasks.len(), 2);
    assert!(day
        .warnings
        .iter()
        .any(|w| w.contains("fixed-time conflict")));

    let rendered = render(&plan);
    assert!(rendered
        .warnings
        .iter()
        .any(|w| w.contains("fixed-time conflict")));
}

#[test]
fn overloaded_single_day_overflows_with_warnings() {
    // 900 minutes of work against a 480-minute day.
    let pool: Vec<Task> = (0..10)
        .map(|i| Task::new(format!("t{i}"), format!("Chunk {i}")).with_duration(90))
        .collect();

    let plan = distribute(pool, monday(), 1, &params()).unwrap();
    assert!(plan
        .warnings
        .iter()
        .any(|w| w.contains("beyond daily capacity")));
}

#[test]
fn rendered_week_carries_dates_and_day_pins() {
    let gym = Task::new("g", "Gym")
        .with_duration(45)
        .with_category("health")
        .with_fixed_days([DayOfWeek::Tuesday, DayOfWeek::Thursday]);

    let week = distribute_week(vec![gym], monday(), &params()).unwrap();
    let rendered = render(&week);

    assert_eq!(rendered.days[1].date, "2025-01-07");
    assert_eq!(rendered.days[1].entries.len(), 1);
    assert_eq!(rendered.days[1].entries[0].category, "health");
    assert!(rendered.days[3].entries.is_empty());
}
