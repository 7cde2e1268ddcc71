use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::dedupe::dedupe_by_day;
use crate::timestamp::parse_date_value;
use crate::types::{DateCandidate, DateKind, DateValue, Task};

/// Collect the dates a task could be shown under
///
/// Completed tasks yield at most one candidate: the due date when present,
/// otherwise the completion date. Open tasks yield one candidate for each of
/// due, scheduled and start that is present; the completion date is ignored.
/// Precomputed datetimes replace the raw dates whenever they are usable.
pub fn extract_candidates(task: &Task, tz: &Tz) -> Vec<DateCandidate> {
    let meta = &task.metadata;
    let enhanced = meta.enhanced_dates.as_ref();

    let due = || {
        field_date(
            task,
            DateKind::Due,
            meta.due_date.as_ref(),
            enhanced.and_then(|e| e.due_date_time.as_ref()),
            tz,
        )
    };

    if task.completed {
        if let Some(date) = due() {
            return vec![DateCandidate::new(date, DateKind::Due)];
        }
        if let Some(date) = field_date(task, DateKind::Completed, meta.completed_date.as_ref(), None, tz) {
            return vec![DateCandidate::new(date, DateKind::Completed)];
        }
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(3);
    if let Some(date) = due() {
        candidates.push(DateCandidate::new(date, DateKind::Due));
    }
    if let Some(date) = field_date(
        task,
        DateKind::Scheduled,
        meta.scheduled_date.as_ref(),
        enhanced.and_then(|e| e.scheduled_date_time.as_ref()),
        tz,
    ) {
        candidates.push(DateCandidate::new(date, DateKind::Scheduled));
    }
    if let Some(date) = field_date(
        task,
        DateKind::Start,
        meta.start_date.as_ref(),
        enhanced.and_then(|e| e.start_date_time.as_ref()),
        tz,
    ) {
        candidates.push(DateCandidate::new(date, DateKind::Start));
    }
    candidates
}

/// Pick the single date that represents a task on the timeline
///
/// # Returns
/// The highest-priority candidate, or None when the task has no usable date
pub fn resolve_task_date(task: &Task, tz: &Tz) -> Option<DateCandidate> {
    let mut candidates = extract_candidates(task, tz);

    let chosen = match candidates.len() {
        0 if task.completed => None,
        0 => {
            // Open task without planning dates: fall back to the completion date
            let fallback: Vec<DateCandidate> =
                field_date(task, DateKind::Completed, task.metadata.completed_date.as_ref(), None, tz)
                    .map(|date| DateCandidate::new(date, DateKind::Completed))
                    .into_iter()
                    .collect();
            dedupe_by_day(fallback).into_iter().next()
        }
        1 => candidates.pop(),
        _ => candidates.into_iter().max_by_key(|c| c.kind),
    };

    match &chosen {
        Some(c) => debug!(task = %task.id, kind = %c.kind, date = %c.date, "resolved anchor date"),
        None => debug!(task = %task.id, "task has no usable date"),
    }
    chosen
}

/// Date of one field, preferring the precomputed datetime over the raw value
///
/// The field counts as present only when the raw value is set. Values that do
/// not parse are treated as absent.
fn field_date(
    task: &Task,
    kind: DateKind,
    raw: Option<&DateValue>,
    enhanced: Option<&DateValue>,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    let raw = raw?;

    if let Some(value) = enhanced {
        match parse_date_value(value, tz) {
            Some(date) => return Some(date),
            None => warn!(task = %task.id, kind = %kind, ?value, "ignoring unparseable precomputed datetime"),
        }
    }

    let parsed = parse_date_value(raw, tz);
    if parsed.is_none() {
        warn!(task = %task.id, kind = %kind, value = ?raw, "ignoring unparseable date");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnhancedDates, TaskMetadata};
    use chrono::TimeZone;

    fn tz() -> Tz {
        chrono_tz::Europe::Moscow
    }

    fn text(s: &str) -> Option<DateValue> {
        Some(DateValue::Text(s.to_string()))
    }

    fn task(completed: bool, metadata: TaskMetadata) -> Task {
        Task {
            id: "task-1".to_string(),
            content: "Prepare slides".to_string(),
            completed,
            status: if completed { "x" } else { " " }.to_string(),
            file_path: None,
            line: None,
            source: None,
            metadata,
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        tz().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_open_task_picks_highest_priority() {
        let meta = TaskMetadata {
            scheduled_date: text("2025-01-14"),
            start_date: text("2025-01-10"),
            due_date: text("2025-01-20"),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(false, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Due);
        assert_eq!(resolved.date, local(2025, 1, 20, 0, 0));
    }

    #[test]
    fn test_open_task_every_subset_resolves_to_max_kind() {
        let kinds = [DateKind::Due, DateKind::Scheduled, DateKind::Start];
        for mask in 1u8..8 {
            let present: Vec<DateKind> = kinds
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            let mut meta = TaskMetadata::default();
            for kind in &present {
                match kind {
                    DateKind::Due => meta.due_date = text("2025-03-03"),
                    DateKind::Scheduled => meta.scheduled_date = text("2025-03-02"),
                    DateKind::Start => meta.start_date = text("2025-03-01"),
                    DateKind::Completed => {}
                }
            }
            let resolved = resolve_task_date(&task(false, meta), &tz()).unwrap();
            assert_eq!(Some(resolved.kind), present.iter().copied().max(), "mask {mask}");
        }
    }

    #[test]
    fn test_open_task_ignores_completed_date_when_planned() {
        let meta = TaskMetadata {
            start_date: text("2025-01-10"),
            completed_date: text("2025-01-12"),
            ..Default::default()
        };
        let candidates = extract_candidates(&task(false, meta), &tz());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, DateKind::Start);
    }

    #[test]
    fn test_completed_task_due_overrides_everything() {
        let meta = TaskMetadata {
            due_date: text("2025-01-15T10:00"),
            scheduled_date: text("2025-01-14"),
            start_date: text("2025-01-13"),
            completed_date: text("2025-01-16T16:00"),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(true, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Due);
        assert_eq!(resolved.date, local(2025, 1, 15, 10, 0));
    }

    #[test]
    fn test_completed_task_falls_back_to_completed_date() {
        let meta = TaskMetadata {
            scheduled_date: text("2025-01-14"),
            completed_date: text("2025-01-16"),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(true, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Completed);
        assert_eq!(resolved.date, local(2025, 1, 16, 0, 0));
    }

    #[test]
    fn test_completed_task_without_due_or_completion_has_no_date() {
        let meta = TaskMetadata {
            scheduled_date: text("2025-01-14"),
            ..Default::default()
        };
        assert!(extract_candidates(&task(true, meta.clone()), &tz()).is_empty());
        assert!(resolve_task_date(&task(true, meta), &tz()).is_none());
    }

    #[test]
    fn test_open_task_with_only_completion_date_uses_fallback() {
        let meta = TaskMetadata {
            completed_date: text("2025-01-16"),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(false, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Completed);
    }

    #[test]
    fn test_no_dates_at_all() {
        assert!(resolve_task_date(&task(false, TaskMetadata::default()), &tz()).is_none());
    }

    #[test]
    fn test_enhanced_datetime_replaces_raw_date() {
        let meta = TaskMetadata {
            due_date: text("2025-01-15"),
            enhanced_dates: Some(EnhancedDates {
                due_date_time: text("2025-01-15T17:45"),
                ..Default::default()
            }),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(false, meta), &tz()).unwrap();
        assert_eq!(resolved.date, local(2025, 1, 15, 17, 45));
    }

    #[test]
    fn test_enhanced_without_raw_is_ignored() {
        let meta = TaskMetadata {
            enhanced_dates: Some(EnhancedDates {
                due_date_time: text("2025-01-15T17:45"),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(resolve_task_date(&task(false, meta), &tz()).is_none());
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let meta = TaskMetadata {
            due_date: text("someday"),
            scheduled_date: text("2025-01-14"),
            enhanced_dates: Some(EnhancedDates {
                scheduled_date_time: text("garbage"),
                ..Default::default()
            }),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(false, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Scheduled);
        assert_eq!(resolved.date, local(2025, 1, 14, 0, 0));
    }

    #[test]
    fn test_completed_task_with_broken_due_uses_completion() {
        let meta = TaskMetadata {
            due_date: text("2025-13-45"),
            completed_date: text("2025-01-16"),
            ..Default::default()
        };
        let resolved = resolve_task_date(&task(true, meta), &tz()).unwrap();
        assert_eq!(resolved.kind, DateKind::Completed);
    }
}
