//! Schedule exporters: iCalendar, HTML, and plain text.
//!
//! Consumes the renderer's exportable shape only; slot times are resolved
//! to absolute UTC through the configured timezone at this boundary.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::io::Write;

use weekwise_core::{resolve_local_utc, ExportableSchedule, TimeOfDay};

pub struct CalendarEvent {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub summary: String,
    pub description: String,
}

/// Resolve every schedule entry into an absolute-time event.
pub fn events_from_schedule(schedule: &ExportableSchedule, tz: &str) -> Result<Vec<CalendarEvent>> {
    let mut events = Vec::new();

    for day in &schedule.days {
        let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .with_context(|| format!("schedule date '{}'", day.date))?;

        for entry in &day.entries {
            let time = TimeOfDay::parse(&entry.time)
                .with_context(|| format!("entry time '{}'", entry.time))?;
            let start_utc = resolve_local_utc(date, time, tz)?;
            let end_utc = start_utc + Duration::minutes(entry.duration_minutes as i64);

            events.push(CalendarEvent {
                start_utc,
                end_utc,
                summary: entry.title.clone(),
                description: format!(
                    "Category: {}\nPriority: {}\nEnergy: {}\nDuration: {}\n",
                    entry.category, entry.priority_label, entry.energy, entry.duration_label
                ),
            });
        }
    }

    Ok(events)
}

/// Emit an ICS calendar with one VEVENT per placed task.
pub fn events_to_ics(events: &[CalendarEvent], schedule_id: &str) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\r\n");
    s.push_str("VERSION:2.0\r\n");
    s.push_str("PRODID:-//Weekwise//Schedule Export//EN\r\n");
    s.push_str("CALSCALE:GREGORIAN\r\n");
    s.push_str("METHOD:PUBLISH\r\n");

    for (i, e) in events.iter().enumerate() {
        let dtstart = e.start_utc.format("%Y%m%dT%H%M%SZ");
        let dtend = e.end_utc.format("%Y%m%dT%H%M%SZ");

        s.push_str("BEGIN:VEVENT\r\n");
        s.push_str(&format!("UID:weekwise-{}-{}@weekwise\r\n", schedule_id, i));
        s.push_str(&format!("DTSTART:{}\r\n", dtstart));
        s.push_str(&format!("DTEND:{}\r\n", dtend));
        s.push_str(&format!("SUMMARY:{}\r\n", escape_ics(&e.summary)));
        s.push_str(&format!("DESCRIPTION:{}\r\n", escape_ics(&e.description)));
        s.push_str("STATUS:CONFIRMED\r\n");
        s.push_str("TRANSP:OPAQUE\r\n");
        s.push_str("END:VEVENT\r\n");
    }

    s.push_str("END:VCALENDAR\r\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// A printable HTML rendition of the schedule.
pub fn schedule_to_html(schedule: &ExportableSchedule, name: &str) -> String {
    let mut body = String::new();

    for day in &schedule.days {
        body.push_str(&format!(
            "    <h2>{} <span class=\"date\">{}</span></h2>\n",
            escape_html(&day.day),
            escape_html(&day.date)
        ));
        if day.entries.is_empty() {
            body.push_str("    <p class=\"free\">Free day</p>\n");
            continue;
        }
        for e in &day.entries {
            body.push_str(&format!(
                "    <div class=\"item\"><span class=\"time\">{}</span> \
                 <span class=\"task\">{}</span><br>{} &middot; {} &middot; priority {}</div>\n",
                escape_html(&e.time),
                escape_html(&e.title),
                escape_html(&e.duration_label),
                escape_html(&e.category),
                escape_html(&e.priority_label),
            ));
        }
    }

    if !schedule.warnings.is_empty() {
        body.push_str("    <h2>Warnings</h2>\n    <ul>\n");
        for w in &schedule.warnings {
            body.push_str(&format!("      <li>{}</li>\n", escape_html(w)));
        }
        body.push_str("    </ul>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{name} - {start} to {end}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 40px; }}
    h1 {{ color: #2c3e50; border-bottom: 2px solid #3498db; }}
    h2 {{ color: #2c3e50; margin-bottom: 4px; }}
    .date {{ color: #7f8c8d; font-size: 0.8em; }}
    .item {{ margin: 8px 0; padding: 10px; border-left: 4px solid #3498db; background: #f8f9fa; }}
    .time {{ font-weight: bold; color: #e74c3c; }}
    .free {{ color: #7f8c8d; font-style: italic; }}
    @media print {{ body {{ margin: 20px; }} }}
  </style>
</head>
<body>
  <h1>{name}</h1>
  <p>{start} to {end}</p>
{body}</body>
</html>
"#,
        name = escape_html(name),
        start = escape_html(&schedule.start_date),
        end = escape_html(&schedule.end_date),
        body = body
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Plain-text rendition, suitable for pasting into an email.
pub fn schedule_to_text(schedule: &ExportableSchedule, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({} to {})\n{}\n",
        name,
        schedule.start_date,
        schedule.end_date,
        "=".repeat(50)
    ));

    for day in &schedule.days {
        out.push_str(&format!("\n{} ({})\n", day.day, day.date));
        if day.entries.is_empty() {
            out.push_str("  (free)\n");
            continue;
        }
        for e in &day.entries {
            out.push_str(&format!(
                "  {} - {} [{} | {} | priority {}]\n",
                e.time, e.title, e.duration_label, e.category, e.priority_label
            ));
        }
    }

    if !schedule.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &schedule.warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    out
}

/// Push ICS content into Google Calendar via `gcalcli import`.
///
/// Requires gcalcli installed and authenticated on this machine.
pub fn push_ics_via_gcalcli(ics: &str, calendar: Option<&str>) -> Result<()> {
    if which::which("gcalcli").is_err() {
        bail!(
            "gcalcli is not installed. Install and authenticate it, then retry.\n\n\
             macOS (brew):  brew install gcalcli\n\
             Ubuntu (pipx): pipx install gcalcli\n\n\
             Or export to a file instead: weekwise export <id> --format ics"
        );
    }

    let mut cmd = std::process::Command::new("gcalcli");
    cmd.arg("import");
    if let Some(cal) = calendar {
        cmd.args(["--calendar", cal]);
    }

    let mut child = cmd
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .spawn()
        .context("spawning gcalcli import")?;

    {
        let stdin = child.stdin.as_mut().context("no stdin")?;
        stdin.write_all(ics.as_bytes()).context("writing ICS to gcalcli")?;
    }

    let status = child.wait().context("waiting on gcalcli")?;
    if !status.success() {
        bail!("gcalcli import failed: {status}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weekwise_core::{
        distribute, render, DistributorParams, Task, TimeOfDay, WorkWindow,
    };

    fn sample_schedule() -> ExportableSchedule {
        let tasks = vec![
            Task::new("a", "Review, plan; commit")
                .with_duration(60)
                .with_fixed_time(TimeOfDay::new(9, 0).unwrap()),
            Task::new("b", "Email sweep").with_duration(30),
        ];
        let params = DistributorParams::with_default_capacity(
            WorkWindow::from_hours(9, 17).unwrap(),
            15,
        );
        let week = distribute(
            tasks,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            1,
            &params,
        )
        .unwrap();
        render(&week)
    }

    #[test]
    fn test_events_resolve_absolute_times() {
        let schedule = sample_schedule();
        // Jan is CST (UTC-6).
        let events = events_from_schedule(&schedule, "America/Chicago").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_utc.to_rfc3339(), "2025-01-06T15:00:00+00:00");
        assert_eq!(events[0].end_utc.to_rfc3339(), "2025-01-06T16:00:00+00:00");
    }

    #[test]
    fn test_ics_structure_and_escaping() {
        let schedule = sample_schedule();
        let events = events_from_schedule(&schedule, "UTC").unwrap();
        let ics = events_to_ics(&events, "s-1");

        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART:20250106T090000Z"));
        assert!(ics.contains("DTEND:20250106T100000Z"));
        assert!(ics.contains("SUMMARY:Review\\, plan\\; commit"));
        assert!(ics.contains("END:VCALENDAR"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn test_text_and_html_render() {
        let schedule = sample_schedule();
        let text = schedule_to_text(&schedule, "My day");
        assert!(text.contains("Monday (2025-01-06)"));
        assert!(text.contains("09:00 - Review, plan; commit"));

        let html = schedule_to_html(&schedule, "My day");
        assert!(html.contains("<h2>Monday"));
        assert!(html.contains("Email sweep"));
    }

    #[test]
    fn test_bad_timezone_is_an_error() {
        let schedule = sample_schedule();
        assert!(events_from_schedule(&schedule, "Mars/OlympusMons").is_err());
    }
}
