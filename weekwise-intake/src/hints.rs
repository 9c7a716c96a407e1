//! Tolerant parsing of analyzer replies into task hints.
//!
//! The analyzer is asked to include a JSON block in its reply, but its
//! output is untrusted: the block may be missing, wrapped in prose, or
//! carry fields of the wrong type. Parsing never fails the caller; at
//! worst it yields no hints.

use regex::Regex;
use serde_json::Value;

use weekwise_core::TaskHints;

use crate::extract::{extract_days, extract_time};

/// Pull the first `{...}` block out of a reply and map it onto hints.
/// Returns `None` when no parseable JSON object is present.
pub fn parse_hint_block(reply: &str) -> Option<TaskHints> {
    let re = Regex::new(r"(?s)\{.*\}").expect("static pattern");
    let blob = re.find(reply)?.as_str();
    let value: Value = serde_json::from_str(blob).ok()?;
    let obj = value.as_object()?;

    Some(TaskHints {
        title: string_field(obj, "title"),
        category: string_field(obj, "category"),
        urgency: int_field(obj, "urgency"),
        importance: int_field(obj, "importance"),
        estimated_minutes: minutes_field(obj),
        due_date: string_field(obj, "due_date"),
        due_time: string_field(obj, "due_time"),
        recurring: obj
            .get("is_recurring")
            .or_else(|| obj.get("recurring"))
            .and_then(Value::as_bool),
        recurrence_pattern: string_field(obj, "recurrence_pattern"),
        energy: string_field(obj, "energy"),
    })
}

/// Deterministic hints from the description alone: a clock time and, when
/// exactly matchable, weekday mentions folded into a specific-days pattern.
pub fn hints_from_description(description: &str) -> TaskHints {
    let mut hints = TaskHints::default();

    if let Some(t) = extract_time(description) {
        hints.due_time = Some(t.to_string());
    }

    let days = extract_days(description);
    if !days.is_empty() {
        hints.recurrence_pattern = Some(
            days.iter()
                .map(|d| d.name())
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    hints
}

/// Overlay analyzer hints on deterministic ones; analyzer fields win
/// where present.
pub fn merge_hints(analyzer: TaskHints, fallback: TaskHints) -> TaskHints {
    TaskHints {
        title: analyzer.title.or(fallback.title),
        category: analyzer.category.or(fallback.category),
        urgency: analyzer.urgency.or(fallback.urgency),
        importance: analyzer.importance.or(fallback.importance),
        estimated_minutes: analyzer.estimated_minutes.or(fallback.estimated_minutes),
        due_date: analyzer.due_date.or(fallback.due_date),
        due_time: analyzer.due_time.or(fallback.due_time),
        recurring: analyzer.recurring.or(fallback.recurring),
        recurrence_pattern: analyzer.recurrence_pattern.or(fallback.recurrence_pattern),
        energy: analyzer.energy.or(fallback.energy),
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn int_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<i32> {
    obj.get(key).and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|f| f.round() as i64))
            .map(|n| n as i32)
    })
}

/// Accept `estimated_minutes` directly, or `estimated_time` given in
/// hours (the phrasing models tend to produce).
fn minutes_field(obj: &serde_json::Map<String, Value>) -> Option<u32> {
    if let Some(m) = obj.get("estimated_minutes").and_then(Value::as_u64) {
        return u32::try_from(m).ok();
    }
    obj.get("estimated_time")
        .and_then(Value::as_f64)
        .filter(|h| *h > 0.0 && *h < 24.0)
        .map(|h| (h * 60.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hint_block_in_prose() {
        let reply = r#"Here is my analysis of the task.

        {"title": "Budget review", "category": "work", "urgency": 7,
         "importance": 8, "estimated_time": 1.5, "due_date": "2025-01-10"}

        Let me know if you need adjustments."#;

        let hints = parse_hint_block(reply).unwrap();
        assert_eq!(hints.title.as_deref(), Some("Budget review"));
        assert_eq!(hints.urgency, Some(7));
        assert_eq!(hints.estimated_minutes, Some(90));
        assert_eq!(hints.due_date.as_deref(), Some("2025-01-10"));
    }

    #[test]
    fn test_parse_hint_block_missing_or_broken() {
        assert_eq!(parse_hint_block("no json here"), None);
        assert_eq!(parse_hint_block("{not valid json"), None);
    }

    #[test]
    fn test_wrong_typed_fields_are_dropped() {
        let reply = r#"{"title": 42, "urgency": "high", "estimated_minutes": 45}"#;
        let hints = parse_hint_block(reply).unwrap();
        assert_eq!(hints.title, None);
        assert_eq!(hints.urgency, None);
        assert_eq!(hints.estimated_minutes, Some(45));
    }

    #[test]
    fn test_hints_from_description() {
        let hints = hints_from_description("Team meeting Friday at 2:00 PM");
        assert_eq!(hints.due_time.as_deref(), Some("14:00"));
        assert_eq!(hints.recurrence_pattern.as_deref(), Some("Friday"));
    }

    #[test]
    fn test_merge_prefers_analyzer_fields() {
        let analyzer = TaskHints {
            urgency: Some(9),
            ..Default::default()
        };
        let fallback = TaskHints {
            urgency: Some(3),
            due_time: Some("14:00".to_string()),
            ..Default::default()
        };
        let merged = merge_hints(analyzer, fallback);
        assert_eq!(merged.urgency, Some(9));
        assert_eq!(merged.due_time.as_deref(), Some("14:00"));
    }
}
