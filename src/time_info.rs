use chrono::DateTime;
use chrono_tz::Tz;

use crate::timestamp::{at_time_of_day, parse_date_value};
use crate::types::{DateKind, DisplayFormat, Task, TimeComponent, TimeComponents, TimeInfo};

/// Work out the time of day (or time range) an event is shown at
///
/// The time component matching `kind` is used when present; otherwise the
/// first of start, due and scheduled time that exists. The component's
/// wall-clock time is applied to the anchor's local calendar day. Without
/// any usable component the anchor itself is returned as a bare date.
///
/// # Arguments
/// * `task` - Task owning the anchor (not modified)
/// * `kind` - Kind of the chosen anchor date
/// * `anchor` - Anchor date picked for the task
pub fn resolve_time_info(task: &Task, kind: DateKind, anchor: &DateTime<Tz>) -> TimeInfo {
    let Some(components) = task.metadata.time_components.as_ref() else {
        return date_only(anchor);
    };

    let Some((component, from_start)) = pick_component(components, kind) else {
        return date_only(anchor);
    };

    let Some(primary_time) = component
        .time
        .to_naive_time()
        .and_then(|time| at_time_of_day(anchor, time))
    else {
        return date_only(anchor);
    };

    // An explicit end exists only for start times paired with an end time
    let mut end_time = if from_start && components.end_time.is_some() {
        task.metadata
            .enhanced_dates
            .as_ref()
            .and_then(|e| e.end_date_time.as_ref())
            .and_then(|value| parse_date_value(value, &anchor.timezone()))
    } else {
        None
    };

    let is_range = component.is_range || end_time.is_some();

    if component.is_range && end_time.is_none() {
        end_time = component
            .range_partner
            .and_then(|partner| partner.to_naive_time())
            .and_then(|time| at_time_of_day(anchor, time));
    }

    TimeInfo {
        primary_time,
        end_time,
        is_range,
        time_component: Some(component.clone()),
        display_format: if is_range {
            DisplayFormat::Range
        } else {
            DisplayFormat::TimeOnly
        },
    }
}

/// Select the component for `kind`, falling back to start > due > scheduled
///
/// The flag tells whether the chosen component is the start time.
fn pick_component(components: &TimeComponents, kind: DateKind) -> Option<(&TimeComponent, bool)> {
    let start = usable(&components.start_time).map(|c| (c, true));
    let due = usable(&components.due_time).map(|c| (c, false));
    let scheduled = usable(&components.scheduled_time).map(|c| (c, false));

    let direct = match kind {
        DateKind::Start => start,
        DateKind::Due => due,
        DateKind::Scheduled => scheduled,
        DateKind::Completed => None,
    };

    direct.or(start).or(due).or(scheduled)
}

fn usable(component: &Option<TimeComponent>) -> Option<&TimeComponent> {
    component
        .as_ref()
        .filter(|c| c.time.to_naive_time().is_some())
}

fn date_only(anchor: &DateTime<Tz>) -> TimeInfo {
    TimeInfo {
        primary_time: *anchor,
        end_time: None,
        is_range: false,
        time_component: None,
        display_format: DisplayFormat::DateTime,
    }
}
