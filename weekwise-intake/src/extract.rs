//! Regex extraction of scheduling cues from free-form task descriptions.

use regex::Regex;
use std::collections::BTreeSet;

use weekwise_core::{DayOfWeek, TimeOfDay};

/// Extract a clock time like "at 10:15 AM" or "by 5:30 pm".
///
/// Phrasings that bind the time to the task ("at", "due at", "by") are
/// preferred over a bare time appearing anywhere in the text.
pub fn extract_time(description: &str) -> Option<TimeOfDay> {
    let patterns = [
        r"(?i)\bat\s+(\d{1,2}):(\d{2})\s*(am|pm)\b",
        r"(?i)\bdue\s+at\s+(\d{1,2}):(\d{2})\s*(am|pm)\b",
        r"(?i)\bby\s+(\d{1,2}):(\d{2})\s*(am|pm)\b",
        r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)\b",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("static pattern");
        if let Some(caps) = re.captures(description) {
            let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
            let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
            let pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");

            let hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };

            if let Ok(t) = TimeOfDay::new(hour, minute) {
                return Some(t);
            }
        }
    }

    None
}

/// Extract weekday names (full or 3-letter) mentioned in the description.
pub fn extract_days(description: &str) -> BTreeSet<DayOfWeek> {
    let re = Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tue|wed|thu|fri|sat|sun)\b",
    )
    .expect("static pattern");

    re.find_iter(description)
        .filter_map(|m| DayOfWeek::parse(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn test_extract_time_am_pm() {
        assert_eq!(extract_time("Meeting at 10:15 AM"), Some(at(10, 15)));
        assert_eq!(extract_time("Report due at 08:00 am"), Some(at(8, 0)));
        assert_eq!(extract_time("Submit by 5:30 PM"), Some(at(17, 30)));
        assert_eq!(extract_time("Sync 2:45 pm with design"), Some(at(14, 45)));
    }

    #[test]
    fn test_extract_time_noon_and_midnight() {
        assert_eq!(extract_time("Lunch at 12:00 PM"), Some(at(12, 0)));
        assert_eq!(extract_time("Batch job at 12:30 AM"), Some(at(0, 30)));
    }

    #[test]
    fn test_extract_time_absent() {
        assert_eq!(extract_time("Walk the dog"), None);
        assert_eq!(extract_time("Call around 5"), None);
    }

    #[test]
    fn test_prefers_bound_time_over_bare() {
        // "at 2:00 PM" should win over the trailing bare time.
        let t = extract_time("Review at 2:00 PM, started 9:00 AM");
        assert_eq!(t, Some(at(14, 0)));
    }

    #[test]
    fn test_extract_days() {
        let days = extract_days("Team sync Monday and wed, maybe FRI");
        assert_eq!(days.len(), 3);
        assert!(days.contains(&DayOfWeek::Monday));
        assert!(days.contains(&DayOfWeek::Wednesday));
        assert!(days.contains(&DayOfWeek::Friday));

        assert!(extract_days("no days here").is_empty());
    }

    #[test]
    fn test_extract_days_dedupes() {
        let days = extract_days("Monday, monday, MON");
        assert_eq!(days.len(), 1);
    }
}
