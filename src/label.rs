use chrono::NaiveDate;

use crate::timestamp::format_hm;
use crate::timestamp::text_time::parse_from_text;
use crate::types::TimelineEvent;

/// How a time label was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Range,
    Single,
    Default,
}

impl LabelStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelStyle::Range => "range",
            LabelStyle::Single => "single",
            LabelStyle::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabel {
    pub text: String,
    pub style: LabelStyle,
    pub duration: Option<String>,
}

/// Time label shown next to an event
///
/// Structured time wins. Without it the task text is searched for a time,
/// and as a last resort the primary time is printed (possibly `00:00`).
pub fn event_time_label(event: &TimelineEvent) -> TimeLabel {
    let info = &event.time_info;

    if let Some(component) = &info.time_component {
        return match info.end_time {
            Some(end) if info.is_range => {
                let minutes = (end - info.primary_time).num_milliseconds() as f64 / 60_000.0;
                let minutes = minutes.round() as i64;
                TimeLabel {
                    text: format!("{}-{}", component.time.format(), format_hm(&end)),
                    style: LabelStyle::Range,
                    duration: (minutes > 0).then(|| format_duration(minutes)),
                }
            }
            _ => TimeLabel {
                text: component.time.format(),
                style: LabelStyle::Single,
                duration: None,
            },
        };
    }

    if let Some(found) = parse_from_text(&event.content) {
        return TimeLabel {
            text: found.display,
            style: if found.is_range {
                LabelStyle::Range
            } else {
                LabelStyle::Single
            },
            duration: None,
        };
    }

    TimeLabel {
        text: format_hm(&info.primary_time),
        style: LabelStyle::Default,
        duration: None,
    }
}

/// Format minutes as `45m`, `2h` or `1h 30m`
pub fn format_duration(minutes: i64) -> String {
    if minutes >= 60 {
        let rest = minutes % 60;
        if rest > 0 {
            format!("{}h {}m", minutes / 60, rest)
        } else {
            format!("{}h", minutes / 60)
        }
    } else {
        format!("{minutes}m")
    }
}

/// Day header: Today, Yesterday, Tomorrow or `Jan 15, 2025`
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%b %d, %Y").to_string(),
    }
}

/// Relative hint for days other than yesterday, today and tomorrow
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> Option<String> {
    let offset = (date - today).num_days();
    match offset {
        -1..=1 => None,
        o if o > 0 => Some(format!("in {o} days")),
        o => Some(format!("{} days ago", -o)),
    }
}

/// Header of a slot holding several events
pub fn group_count_label(count: usize) -> String {
    format!("{count} events")
}

/// Header of the all-day section
pub fn all_day_count_label(count: usize) -> String {
    if count == 1 {
        "1 all-day event".to_string()
    } else {
        format!("{count} all-day events")
    }
}
