use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::grouping::{compare_events, group_by_day};
use crate::resolve::resolve_task_date;
use crate::time_info::resolve_time_info;
use crate::timestamp::day_key;
use crate::types::{DayTimeline, Task, TimelineEvent};

/// Parse a JSON array of tasks, skipping entries that are not valid tasks
///
/// Only a document that is not a JSON array of values is an error. A single
/// malformed task is logged and dropped so the rest of the snapshot still
/// reaches the timeline.
pub fn parse_tasks(raw: &str) -> Result<Vec<Task>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();

    let tasks: Vec<Task> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed task");
                None
            }
        })
        .collect();

    debug!(total, parsed = tasks.len(), "parsed tasks");
    Ok(tasks)
}

/// Drop tasks that must not reach the timeline
///
/// With completed tasks hidden, only open tasks whose status is not an
/// abandoned marker remain. Calendar subscription entries shown as badges are
/// always removed.
pub fn filter_tasks(mut tasks: Vec<Task>, config: &Config) -> Vec<Task> {
    if !config.timeline.show_completed_tasks {
        let abandoned = config.task_statuses.abandoned_markers();
        tasks.retain(|t| !t.completed && !abandoned.contains(&t.status.as_str()));
    }
    tasks.retain(|t| !is_calendar_badge(t));
    tasks
}

fn is_calendar_badge(task: &Task) -> bool {
    task.source
        .as_ref()
        .map(|s| s.source_type == "ics" && s.show_type.as_deref() == Some("badge"))
        .unwrap_or(false)
}

/// Turn a task snapshot into timeline events, newest anchor first
///
/// Each task yields at most one event. Tasks without a usable date are
/// skipped.
pub fn load_events(tasks: Vec<Task>, config: &Config, today: NaiveDate, tz: &Tz) -> Vec<TimelineEvent> {
    let total = tasks.len();
    let tasks = filter_tasks(tasks, config);
    debug!(total, kept = tasks.len(), "filtered tasks");

    let mut events: Vec<TimelineEvent> = tasks
        .into_iter()
        .filter_map(|task| {
            let anchor = resolve_task_date(&task, tz)?;
            let time_info = resolve_time_info(&task, anchor.kind, &anchor.date);
            Some(TimelineEvent {
                id: format!("{}-{}", task.id, anchor.kind),
                content: task.content.clone(),
                time: anchor.date,
                kind: anchor.kind,
                is_today: day_key(&anchor.date) == today,
                task,
                time_info,
            })
        })
        .collect();

    events.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| compare_events(a, b)));
    events
}

/// Full pipeline: filter, resolve, group by day and by time slot
pub fn build_timeline(tasks: Vec<Task>, config: &Config, today: NaiveDate, tz: &Tz) -> Vec<DayTimeline> {
    group_by_day(load_events(tasks, config, today, tz), today)
}

/// Current calendar day in the zone
pub fn today_in(tz: &Tz) -> NaiveDate {
    tz.from_utc_datetime(&chrono::Utc::now().naive_utc()).date_naive()
}
