use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Role a date plays on a task.
///
/// Ordering follows priority: `Due > Scheduled > Start > Completed`.
/// Every resolution step compares kinds through this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    Due,
    Scheduled,
    Start,
    Completed,
}

impl DateKind {
    pub fn priority(self) -> u8 {
        match self {
            DateKind::Due => 4,
            DateKind::Scheduled => 3,
            DateKind::Start => 2,
            DateKind::Completed => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateKind::Due => "due",
            DateKind::Scheduled => "scheduled",
            DateKind::Start => "start",
            DateKind::Completed => "completed",
        }
    }
}

impl Ord for DateKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for DateKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw date as supplied by the task provider: epoch milliseconds or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Millis(i64),
    Text(String),
}

/// Wall-clock time of day with optional seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    pub hour: u32,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
}

impl TimePoint {
    /// `None` when any field is out of range
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second.unwrap_or(0))
    }

    /// Format as `HH:MM` or `HH:MM:SS` when seconds are present
    pub fn format(&self) -> String {
        match self.second {
            Some(second) => format!("{:02}:{:02}:{:02}", self.hour, self.minute, second),
            None => format!("{:02}:{:02}", self.hour, self.minute),
        }
    }
}

/// Parsed time attached to one of the task's dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeComponent {
    #[serde(flatten)]
    pub time: TimePoint,
    #[serde(default)]
    pub is_range: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_partner: Option<TimePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeComponents {
    #[serde(default)]
    pub start_time: Option<TimeComponent>,
    #[serde(default)]
    pub end_time: Option<TimeComponent>,
    #[serde(default)]
    pub due_time: Option<TimeComponent>,
    #[serde(default)]
    pub scheduled_time: Option<TimeComponent>,
}

/// Datetimes precomputed upstream by combining dates with their time components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedDates {
    #[serde(default)]
    pub due_date_time: Option<DateValue>,
    #[serde(default)]
    pub scheduled_date_time: Option<DateValue>,
    #[serde(default)]
    pub start_date_time: Option<DateValue>,
    #[serde(default)]
    pub end_date_time: Option<DateValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    #[serde(default)]
    pub due_date: Option<DateValue>,
    #[serde(default)]
    pub scheduled_date: Option<DateValue>,
    #[serde(default)]
    pub start_date: Option<DateValue>,
    #[serde(default)]
    pub completed_date: Option<DateValue>,
    #[serde(default)]
    pub time_components: Option<TimeComponents>,
    #[serde(default)]
    pub enhanced_dates: Option<EnhancedDates>,
}

/// Where a task came from (e.g. an ICS calendar subscription)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub show_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TaskSource>,
    #[serde(default)]
    pub metadata: TaskMetadata,
}

fn default_status() -> String {
    " ".to_string()
}

/// A date considered as the task's anchor, tagged with its role
#[derive(Debug, Clone, PartialEq)]
pub struct DateCandidate {
    pub date: DateTime<Tz>,
    pub kind: DateKind,
}

impl DateCandidate {
    pub fn new(date: DateTime<Tz>, kind: DateKind) -> Self {
        Self { date, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayFormat {
    TimeOnly,
    DateTime,
    Range,
}

impl DisplayFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayFormat::TimeOnly => "time-only",
            DisplayFormat::DateTime => "date-time",
            DisplayFormat::Range => "range",
        }
    }
}

/// Effective time of an event after combining its anchor with time components
#[derive(Debug, Clone, PartialEq)]
pub struct TimeInfo {
    pub primary_time: DateTime<Tz>,
    pub end_time: Option<DateTime<Tz>>,
    pub is_range: bool,
    pub time_component: Option<TimeComponent>,
    pub display_format: DisplayFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    pub content: String,
    pub time: DateTime<Tz>,
    pub kind: DateKind,
    pub is_today: bool,
    pub task: Task,
    pub time_info: TimeInfo,
}

impl TimelineEvent {
    /// Time used for ordering events
    pub fn effective_time(&self) -> DateTime<Tz> {
        self.time_info.primary_time
    }
}

/// Timed events sharing the same time label
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGroup {
    pub label: String,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedEvents {
    pub timed: Vec<TimeGroup>,
    pub all_day: Vec<TimelineEvent>,
}

impl GroupedEvents {
    pub fn len(&self) -> usize {
        self.timed.iter().map(|g| g.events.len()).sum::<usize>() + self.all_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timed.is_empty() && self.all_day.is_empty()
    }
}

/// All events whose anchor falls on one local calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayTimeline {
    pub date: NaiveDate,
    pub is_today: bool,
    pub events: GroupedEvents,
}
