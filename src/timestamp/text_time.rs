use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Each pattern must not start inside a longer number ("Build 123:45").

// Time range: 15:00-16:30, 9:00 ~ 10:00, 08:00:00～09:30:00
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:^|[^0-9])([01]?[0-9]|2[0-3]):([0-5][0-9])(?::([0-5][0-9]))?",
        r"\s*[-~～]\s*",
        r"([01]?[0-9]|2[0-3]):([0-5][0-9])(?::([0-5][0-9]))?",
    ))
    .expect("Invalid RANGE_RE regex")
});

// 12-hour time: 3:30 PM, 11:15:20am
static TWELVE_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])(1[0-2]|0?[1-9]):([0-5][0-9])(?::([0-5][0-9]))?\s*(?i:(am|pm))")
        .expect("Invalid TWELVE_HOUR_RE regex")
});

// 24-hour time: 15:00, 7:05:30
static TWENTY_FOUR_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([01]?[0-9]|2[0-3]):([0-5][0-9])(?::([0-5][0-9]))?")
        .expect("Invalid TWENTY_FOUR_HOUR_RE regex")
});

/// Time label recovered from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTime {
    pub display: String,
    pub is_range: bool,
}

/// Find a time or time range written in the task text
///
/// Patterns are tried in order: 24-hour range, 12-hour time with AM/PM,
/// 24-hour time. Only meant for labels, never for ordering.
///
/// # Returns
/// Normalized `HH:MM[:SS]` (or `HH:MM[:SS]-HH:MM[:SS]`) label, or None
pub fn parse_from_text(content: &str) -> Option<TextTime> {
    if let Some(caps) = RANGE_RE.captures(content) {
        let start = hms_label(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
        let end = hms_label(&caps[4], &caps[5], caps.get(6).map(|m| m.as_str()));
        return Some(TextTime {
            display: format!("{start}-{end}"),
            is_range: true,
        });
    }

    if let Some(caps) = TWELVE_HOUR_RE.captures(content) {
        return twelve_hour_label(&caps).map(|display| TextTime {
            display,
            is_range: false,
        });
    }

    if let Some(caps) = TWENTY_FOUR_HOUR_RE.captures(content) {
        return Some(TextTime {
            display: hms_label(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str())),
            is_range: false,
        });
    }

    None
}

/// True when any of the time patterns occurs in the text
pub fn has_text_time(content: &str) -> bool {
    RANGE_RE.is_match(content)
        || TWELVE_HOUR_RE.is_match(content)
        || TWENTY_FOUR_HOUR_RE.is_match(content)
}

fn twelve_hour_label(caps: &Captures<'_>) -> Option<String> {
    let hour: u32 = caps[1].parse().ok()?;
    let hour = match (hour, caps[4].eq_ignore_ascii_case("pm")) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    let hour = format!("{hour:02}");
    Some(hms_label(&hour, &caps[2], caps.get(3).map(|m| m.as_str())))
}

fn hms_label(hour: &str, minute: &str, second: Option<&str>) -> String {
    match second {
        Some(second) => format!("{hour:0>2}:{minute}:{second}"),
        None => format!("{hour:0>2}:{minute}"),
    }
}
