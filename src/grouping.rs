use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::timestamp::text_time::has_text_time;
use crate::timestamp::{day_key, format_hm, is_midnight};
use crate::types::{DayTimeline, GroupedEvents, TimeGroup, TimelineEvent};

/// Chronological order: effective time, then content, then id
pub fn compare_events(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    a.effective_time()
        .cmp(&b.effective_time())
        .then_with(|| a.content.cmp(&b.content))
        .then_with(|| a.id.cmp(&b.id))
}

/// Whether the event is shown at a time of day rather than as all-day
pub fn has_specific_time(event: &TimelineEvent) -> bool {
    event.time_info.time_component.is_some()
        || has_text_time(&event.content)
        || !is_midnight(&event.effective_time())
}

/// Label shared by events displayed in the same time slot
pub fn time_group_key(event: &TimelineEvent) -> String {
    match &event.time_info.time_component {
        Some(component) => component.time.format(),
        None => format_hm(&event.effective_time()),
    }
}

/// Sort events and split them into time slots and all-day events
///
/// Slots appear in the order of their earliest event; events inside a slot
/// and in the all-day list keep the sorted order.
pub fn group_events(mut events: Vec<TimelineEvent>) -> GroupedEvents {
    events.sort_by(compare_events);

    let mut grouped = GroupedEvents::default();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for event in events {
        if !has_specific_time(&event) {
            grouped.all_day.push(event);
            continue;
        }

        let label = time_group_key(&event);
        match slots.get(&label) {
            Some(&idx) => grouped.timed[idx].events.push(event),
            None => {
                slots.insert(label.clone(), grouped.timed.len());
                grouped.timed.push(TimeGroup {
                    label,
                    events: vec![event],
                });
            }
        }
    }

    grouped
}

/// Bucket events by the local day of their anchor and group each day
///
/// Days keep the order in which they first appear in `events`.
pub fn group_by_day(events: Vec<TimelineEvent>, today: NaiveDate) -> Vec<DayTimeline> {
    let mut slots: HashMap<NaiveDate, usize> = HashMap::new();
    let mut days: Vec<(NaiveDate, Vec<TimelineEvent>)> = Vec::new();

    for event in events {
        let key = day_key(&event.time);
        match slots.get(&key) {
            Some(&idx) => days[idx].1.push(event),
            None => {
                slots.insert(key, days.len());
                days.push((key, vec![event]));
            }
        }
    }

    days.into_iter()
        .map(|(date, events)| DayTimeline {
            date,
            is_today: date == today,
            events: group_events(events),
        })
        .collect()
}
