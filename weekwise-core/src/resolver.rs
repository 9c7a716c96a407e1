//! Per-day conflict resolution: fit flexible tasks into the gaps around
//! fixed-time ones.
//!
//! Fixed tasks are placed verbatim at their declared times; the resolver
//! has no authority to move a user-pinned slot, so overlapping fixed tasks
//! both stay and a warning is recorded. Flexible tasks are walked in
//! priority order and dropped (with a warning) when nothing fits.

use crate::schedule::PlacedTask;
use crate::task::Task;
use crate::time::{TimeOfDay, WorkWindow};

pub const DEFAULT_BUFFER_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct DayResolution {
    /// Placed tasks sorted by start time.
    pub placed: Vec<PlacedTask>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Gap {
    cursor: u32,
    end: u32,
}

impl Gap {
    fn remaining(&self) -> u32 {
        self.end.saturating_sub(self.cursor)
    }
}

/// Resolve one day's tasks into concrete non-overlapping slots.
///
/// `buffer_minutes` is inserted after every placed task before the next
/// flexible one may start; no buffer is needed after the final task.
pub fn resolve_day(tasks: &[Task], window: WorkWindow, buffer_minutes: u32) -> DayResolution {
    let mut warnings = Vec::new();

    let mut fixed: Vec<&Task> = tasks.iter().filter(|t| t.fixed_time.is_some()).collect();
    let mut flexible: Vec<&Task> = tasks.iter().filter(|t| t.fixed_time.is_none()).collect();

    fixed.sort_by_key(|t| t.fixed_time);
    // Stable sort keeps input order among equal priorities.
    flexible.sort_by(|a, b| b.priority().cmp(&a.priority()));

    let mut placed: Vec<PlacedTask> = Vec::new();

    for t in &fixed {
        if let Some(start) = t.fixed_time {
            placed.push(PlacedTask {
                start,
                task: (*t).clone(),
            });
        }
    }

    // Fixed-fixed collisions are surfaced, never auto-resolved.
    for pair in placed.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            warnings.push(format!(
                "fixed-time conflict: '{}' at {} overlaps '{}' at {}",
                pair[0].task.title, pair[0].start, pair[1].task.title, pair[1].start
            ));
        }
    }

    let mut gaps = build_gaps(&placed, window, buffer_minutes);

    for t in &flexible {
        if t.duration_minutes > window.len_minutes() {
            warnings.push(format!(
                "'{}' ({} min) exceeds the work window; left unscheduled",
                t.title, t.duration_minutes
            ));
            continue;
        }

        let mut slot = None;
        for gap in gaps.iter_mut() {
            if gap.remaining() >= t.duration_minutes {
                slot = Some(gap.cursor);
                gap.cursor += t.duration_minutes + buffer_minutes;
                break;
            }
        }

        match slot {
            Some(start_minutes) => {
                // start_minutes stays inside the window, so < 1440.
                if let Ok(start) = TimeOfDay::from_minutes(start_minutes) {
                    placed.push(PlacedTask {
                        start,
                        task: (*t).clone(),
                    });
                }
            }
            None => warnings.push(format!(
                "no free slot for '{}' ({} min); left unscheduled",
                t.title, t.duration_minutes
            )),
        }
    }

    placed.sort_by_key(|p| p.start_minutes());

    DayResolution { placed, warnings }
}

/// Free intervals within the window: before the first fixed task, between
/// consecutive fixed tasks, and after the last one. The whole window is a
/// single gap when there are no fixed tasks.
fn build_gaps(fixed_placed: &[PlacedTask], window: WorkWindow, buffer_minutes: u32) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = window.start_minutes();

    for p in fixed_placed {
        let start = p.start_minutes().min(window.end_minutes());
        if start > cursor {
            gaps.push(Gap { cursor, end: start });
        }
        cursor = cursor.max(p.end_minutes() + buffer_minutes);
    }

    if cursor < window.end_minutes() {
        gaps.push(Gap {
            cursor,
            end: window.end_minutes(),
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    fn window_9_17() -> WorkWindow {
        WorkWindow::from_hours(9, 17).unwrap()
    }

    fn at(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn starts(res: &DayResolution) -> Vec<String> {
        res.placed
            .iter()
            .map(|p| format!("{} {}", p.start, p.task.title))
            .collect()
    }

    #[test]
    fn test_empty_day() {
        let res = resolve_day(&[], window_9_17(), DEFAULT_BUFFER_MINUTES);
        assert!(res.placed.is_empty());
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn test_flexible_fill_around_fixed() {
        let standup = Task::new("s", "Standup")
            .with_duration(30)
            .with_fixed_time(at(11, 0));
        let a = Task::new("a", "A").with_duration(90).with_priority(9, 9);
        let b = Task::new("b", "B").with_duration(60).with_priority(5, 5);

        let res = resolve_day(
            &[b.clone(), standup.clone(), a.clone()],
            window_9_17(),
            15,
        );

        assert_eq!(
            starts(&res),
            vec!["09:00 A", "11:00 Standup", "11:45 B"],
            "highest priority fills the pre-standup gap, next task lands after"
        );
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn test_no_overlap_invariant() {
        let tasks = vec![
            Task::new("f", "Fixed").with_duration(45).with_fixed_time(at(10, 0)),
            Task::new("x", "X").with_duration(120).with_priority(8, 8),
            Task::new("y", "Y").with_duration(60).with_priority(7, 7),
            Task::new("z", "Z").with_duration(30).with_priority(2, 2),
        ];
        let res = resolve_day(&tasks, window_9_17(), 15);

        for i in 0..res.placed.len() {
            for j in (i + 1)..res.placed.len() {
                assert!(
                    !res.placed[i].overlaps(&res.placed[j]),
                    "{} overlaps {}",
                    res.placed[i].task.title,
                    res.placed[j].task.title
                );
            }
        }
    }

    #[test]
    fn test_fixed_fixed_conflict_both_kept() {
        let a = Task::new("a", "Call").with_duration(60).with_fixed_time(at(14, 0));
        let b = Task::new("b", "Review").with_duration(30).with_fixed_time(at(14, 0));

        let res = resolve_day(&[a, b], window_9_17(), 15);
        assert_eq!(res.placed.len(), 2);
        assert!(res.placed.iter().all(|p| p.start == at(14, 0)));
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("fixed-time conflict"));
    }

    #[test]
    fn test_overflowing_day_warns_and_omits() {
        // 8h window, 15-min buffer: three 3h tasks cannot all fit.
        let tasks: Vec<Task> = (0..3)
            .map(|i| Task::new(format!("t{i}"), format!("Block {i}")).with_duration(180))
            .collect();
        let res = resolve_day(&tasks, window_9_17(), 15);

        assert_eq!(res.placed.len(), 2);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("no free slot"));
    }

    #[test]
    fn test_task_longer_than_window_is_rejected() {
        let t = Task::new("t", "Marathon").with_duration(10 * 60);
        let res = resolve_day(&[t], window_9_17(), 15);
        assert!(res.placed.is_empty());
        assert!(res.warnings[0].contains("exceeds the work window"));
    }

    #[test]
    fn test_priority_order_respected_for_flexible() {
        let low = Task::new("l", "Low").with_duration(60).with_priority(2, 2);
        let high = Task::new("h", "High").with_duration(60).with_priority(9, 9);
        let res = resolve_day(&[low, high], window_9_17(), 15);

        assert_eq!(res.placed[0].task.title, "High");
        assert_eq!(res.placed[0].start, at(9, 0));
        assert_eq!(res.placed[1].start, at(10, 15));
    }

    #[test]
    fn test_fixed_task_late_in_window_gets_tail_gap() {
        let fixed = Task::new("f", "Wrap-up")
            .with_duration(30)
            .with_fixed_time(at(16, 30));
        let flex = Task::new("x", "Writing").with_duration(60);
        let res = resolve_day(&[fixed, flex], window_9_17(), 15);

        assert_eq!(starts(&res), vec!["09:00 Writing", "16:30 Wrap-up"]);
    }
}
