//! Time value types: clock times, weekdays, work windows.
//!
//! The scheduler does all slot math in minutes-since-midnight; timezone
//! resolution only happens at the export boundary.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::SchedulerError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A clock time within a day, stored as minutes since midnight.
///
/// Invariant: always `< 1440`. Serializes as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, SchedulerError> {
        if hour >= 24 || minute >= 60 {
            return Err(SchedulerError::InvalidInput(format!(
                "time out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    pub fn from_minutes(minutes: u32) -> Result<Self, SchedulerError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(SchedulerError::InvalidInput(format!(
                "minutes out of range: {minutes}"
            )));
        }
        Ok(Self(minutes))
    }

    /// Parse `"HH:MM"` (24-hour).
    pub fn parse(s: &str) -> Result<Self, SchedulerError> {
        let err = || SchedulerError::InvalidInput(format!("invalid time '{s}', expected HH:MM"));
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: u32 = h.parse().map_err(|_| err())?;
        let minute: u32 = m.parse().map_err(|_| err())?;
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.0
    }

    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Day of week, Monday-first.
///
/// `chrono::Weekday` lacks `Ord`, so scheduling code uses this type for
/// ordered day sets and converts at the chrono boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Monday = 0 .. Sunday = 6.
    pub fn index(&self) -> usize {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    /// Parse a day name, accepting full names and 3-letter abbreviations,
    /// case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(DayOfWeek::Monday),
            "tuesday" | "tue" | "tues" => Some(DayOfWeek::Tuesday),
            "wednesday" | "wed" => Some(DayOfWeek::Wednesday),
            "thursday" | "thu" | "thur" | "thurs" => Some(DayOfWeek::Thursday),
            "friday" | "fri" => Some(DayOfWeek::Friday),
            "saturday" | "sat" => Some(DayOfWeek::Saturday),
            "sunday" | "sun" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a comma-separated day list into an ordered set. Unrecognized
/// entries are skipped.
pub fn parse_day_set(s: &str) -> BTreeSet<DayOfWeek> {
    s.split(',').filter_map(DayOfWeek::parse).collect()
}

/// Working-hours window `[start, end)` in minutes since midnight.
///
/// `end` may be 1440 to mean midnight at the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    start_minutes: u32,
    end_minutes: u32,
}

impl WorkWindow {
    pub fn new(start: TimeOfDay, end_minutes: u32) -> Result<Self, SchedulerError> {
        if end_minutes > MINUTES_PER_DAY || start.minutes_from_midnight() >= end_minutes {
            return Err(SchedulerError::InvalidInput(format!(
                "invalid work window: start {} end minute {}",
                start, end_minutes
            )));
        }
        Ok(Self {
            start_minutes: start.minutes_from_midnight(),
            end_minutes,
        })
    }

    pub fn from_hours(start_hour: u32, end_hour: u32) -> Result<Self, SchedulerError> {
        if start_hour >= 24 || end_hour > 24 || start_hour >= end_hour {
            return Err(SchedulerError::InvalidInput(format!(
                "invalid work hours: {start_hour}-{end_hour}"
            )));
        }
        Ok(Self {
            start_minutes: start_hour * 60,
            end_minutes: end_hour * 60,
        })
    }

    /// Parse `"9-17"` style hour ranges.
    pub fn parse_hours(s: &str) -> Result<Self, SchedulerError> {
        let err = || SchedulerError::InvalidInput(format!("invalid work hours '{s}', expected e.g. 9-17"));
        let (a, b) = s.trim().split_once('-').ok_or_else(err)?;
        let start: u32 = a.trim().parse().map_err(|_| err())?;
        let end: u32 = b.trim().parse().map_err(|_| err())?;
        Self::from_hours(start, end)
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_minutes
    }

    pub fn end_minutes(&self) -> u32 {
        self.end_minutes
    }

    pub fn len_minutes(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }

    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start_minutes && minute < self.end_minutes
    }
}

/// Resolve a local wall-clock slot (date + time in an IANA tz) to UTC.
///
/// Used by exporters to turn schedule slots into absolute timestamps.
pub fn resolve_local_utc(date: NaiveDate, time: TimeOfDay, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let ndt = NaiveDateTime::new(date, time.to_naive());
    let local = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {date} {time} {tz}"))?;

    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_parse_and_display() {
        let t = TimeOfDay::parse("09:05").unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "09:05");

        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("10:60").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
    }

    #[test]
    fn test_time_of_day_serde_round_trip() {
        let t = TimeOfDay::new(14, 30).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"14:30\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_day_of_week_parse() {
        assert_eq!(DayOfWeek::parse("monday"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::parse("WED"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::parse("fri "), Some(DayOfWeek::Friday));
        assert_eq!(DayOfWeek::parse("someday"), None);

        let days = parse_day_set("Monday, wed,fri,bogus");
        assert_eq!(days.len(), 3);
        assert!(days.contains(&DayOfWeek::Wednesday));
    }

    #[test]
    fn test_work_window_parse() {
        let w = WorkWindow::parse_hours("9-17").unwrap();
        assert_eq!(w.start_minutes(), 9 * 60);
        assert_eq!(w.end_minutes(), 17 * 60);
        assert_eq!(w.len_minutes(), 8 * 60);

        assert!(WorkWindow::parse_hours("17-9").is_err());
        assert!(WorkWindow::parse_hours("9").is_err());
    }

    #[test]
    fn test_resolve_chicago_slot() {
        // Feb is CST (UTC-6)
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let t = TimeOfDay::new(9, 0).unwrap();
        let utc = resolve_local_utc(date, t, "America/Chicago").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-20T15:00:00+00:00");
    }
}
