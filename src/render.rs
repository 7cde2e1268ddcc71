use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::label::{
    all_day_count_label, day_label, event_time_label, group_count_label, relative_label, TimeLabel,
};
use crate::types::{DateKind, DayTimeline, DisplayFormat, TimeGroup, TimelineEvent};

#[derive(Serialize)]
struct DayView<'a> {
    date: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    relative: Option<String>,
    is_today: bool,
    timed: Vec<TimeGroupView<'a>>,
    all_day: Vec<EventView<'a>>,
}

#[derive(Serialize)]
struct TimeGroupView<'a> {
    label: &'a str,
    events: Vec<EventView<'a>>,
}

#[derive(Serialize)]
struct EventView<'a> {
    id: &'a str,
    task_id: &'a str,
    content: &'a str,
    kind: DateKind,
    status: &'a str,
    completed: bool,
    is_today: bool,
    time: String,
    primary_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    is_range: bool,
    display_format: DisplayFormat,
    time_label: String,
    label_style: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

fn iso(date: &DateTime<Tz>) -> String {
    date.to_rfc3339()
}

fn event_view(event: &TimelineEvent) -> EventView<'_> {
    let label = event_time_label(event);
    let info = &event.time_info;
    EventView {
        id: &event.id,
        task_id: &event.task.id,
        content: &event.content,
        kind: event.kind,
        status: &event.task.status,
        completed: event.task.completed,
        is_today: event.is_today,
        time: iso(&event.time),
        primary_time: iso(&info.primary_time),
        end_time: info.end_time.as_ref().map(iso),
        is_range: info.is_range,
        display_format: info.display_format,
        time_label: label.text,
        label_style: label.style.as_str(),
        duration: label.duration,
        file: event.task.file_path.as_deref(),
        line: event.task.line,
    }
}

/// Render day timelines as pretty JSON
pub fn render_days_json(days: &[DayTimeline], today: NaiveDate) -> Result<String, serde_json::Error> {
    let views: Vec<DayView<'_>> = days
        .iter()
        .map(|day| DayView {
            date: day.date.format("%Y-%m-%d").to_string(),
            label: day_label(day.date, today),
            relative: relative_label(day.date, today),
            is_today: day.is_today,
            timed: day
                .events
                .timed
                .iter()
                .map(|group| TimeGroupView {
                    label: &group.label,
                    events: group.events.iter().map(event_view).collect(),
                })
                .collect(),
            all_day: day.events.all_day.iter().map(event_view).collect(),
        })
        .collect();
    serde_json::to_string_pretty(&views)
}

/// Header for a time slot: the event's own label when alone, the shared key otherwise
fn slot_header(group: &TimeGroup) -> String {
    match group.events.as_slice() {
        [only] => label_text(&event_time_label(only)),
        events => format!("{} ({})", group.label, group_count_label(events.len())),
    }
}

fn label_text(label: &TimeLabel) -> String {
    match &label.duration {
        Some(duration) => format!("{} ({duration})", label.text),
        None => label.text.clone(),
    }
}

fn day_header(day: &DayTimeline, today: NaiveDate) -> String {
    let mut header = day_label(day.date, today);
    if let Some(relative) = relative_label(day.date, today) {
        header.push_str(&format!(" ({relative})"));
    }
    header
}

fn checkbox(event: &TimelineEvent) -> &'static str {
    if event.task.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render day timelines as Markdown
pub fn render_days_markdown(days: &[DayTimeline], today: NaiveDate) -> String {
    let mut output = String::from("# Timeline\n\n");

    if days.is_empty() {
        output.push_str("No events to display\n");
        return output;
    }

    for day in days {
        output.push_str(&format!("## {}\n\n", day_header(day, today)));

        for group in &day.events.timed {
            output.push_str(&format!("### {}\n\n", slot_header(group)));
            for event in &group.events {
                render_event_md(&mut output, event);
            }
            output.push('\n');
        }

        if !day.events.all_day.is_empty() {
            output.push_str(&format!(
                "### All day ({})\n\n",
                all_day_count_label(day.events.all_day.len())
            ));
            for event in &day.events.all_day {
                render_event_md(&mut output, event);
            }
            output.push('\n');
        }
    }

    output
}

fn render_event_md(output: &mut String, event: &TimelineEvent) {
    output.push_str(&format!("- {} {}", checkbox(event), event.content));
    if let Some(ref file) = event.task.file_path {
        match event.task.line {
            Some(line) => output.push_str(&format!(" `{file}:{line}`")),
            None => output.push_str(&format!(" `{file}`")),
        }
    }
    output.push('\n');
}

/// Render day timelines as HTML
pub fn render_days_html(days: &[DayTimeline], today: NaiveDate) -> String {
    let mut output = String::from("<html><body><h1>Timeline</h1>\n");

    if days.is_empty() {
        output.push_str("<p>No events to display</p>\n");
    }

    for day in days {
        let class = if day.is_today { " class=\"is-today\"" } else { "" };
        output.push_str(&format!(
            "<h2{class}>{}</h2>\n",
            html_escape(&day_header(day, today))
        ));

        for group in &day.events.timed {
            output.push_str(&format!("<h3>{}</h3>\n<ul>\n", html_escape(&slot_header(group))));
            for event in &group.events {
                render_event_html(&mut output, event);
            }
            output.push_str("</ul>\n");
        }

        if !day.events.all_day.is_empty() {
            output.push_str(&format!(
                "<h3>All day ({})</h3>\n<ul>\n",
                all_day_count_label(day.events.all_day.len())
            ));
            for event in &day.events.all_day {
                render_event_html(&mut output, event);
            }
            output.push_str("</ul>\n");
        }
    }

    output.push_str("</body></html>");
    output
}

fn render_event_html(output: &mut String, event: &TimelineEvent) {
    let class = if event.task.completed { " class=\"is-completed\"" } else { "" };
    output.push_str(&format!(
        "<li{class} data-event-id=\"{}\">{} {}</li>\n",
        html_escape(&event.id),
        checkbox(event),
        html_escape(&event.content)
    ));
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
