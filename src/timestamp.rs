use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::types::DateValue;

pub mod text_time;

/// Local date-time layouts accepted for textual dates, tried in order
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Convert a raw date value into an instant in the given zone
///
/// # Arguments
/// * `value` - Epoch milliseconds or a textual date
/// * `tz` - Zone used for local calendar arithmetic
///
/// # Returns
/// The instant, or None when the value does not describe a real point in time
pub fn parse_date_value(value: &DateValue, tz: &Tz) -> Option<DateTime<Tz>> {
    match value {
        DateValue::Millis(ms) => tz.timestamp_millis_opt(*ms).single(),
        DateValue::Text(text) => parse_date_text(text.trim(), tz),
    }
}

fn parse_date_text(text: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(tz));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    local_midnight(date, tz)
}

/// Start of the given calendar day in the zone
///
/// Where a DST change skips midnight the day starts at 01:00 local time.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
        .or_else(|| tz.from_local_datetime(&date.and_hms_opt(1, 0, 0)?).earliest())
}

/// Local calendar day of an instant, the key used for day buckets
pub fn day_key(date: &DateTime<Tz>) -> NaiveDate {
    date.date_naive()
}

/// Keep the calendar day of `anchor`, replace its wall-clock time
///
/// Returns None when the local time does not exist on that day.
pub fn at_time_of_day(anchor: &DateTime<Tz>, time: NaiveTime) -> Option<DateTime<Tz>> {
    anchor
        .timezone()
        .from_local_datetime(&anchor.date_naive().and_time(time))
        .earliest()
}

/// True when local hour, minute and second are all zero
pub fn is_midnight(date: &DateTime<Tz>) -> bool {
    date.hour() == 0 && date.minute() == 0 && date.second() == 0
}

/// Format instant as `HH:MM` in its own zone
pub fn format_hm(date: &DateTime<Tz>) -> String {
    date.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moscow() -> Tz {
        "Europe/Moscow".parse().unwrap()
    }

    #[test]
    fn test_parse_plain_date_is_local_midnight() {
        let tz = moscow();
        let parsed = parse_date_value(&DateValue::Text("2025-01-15".to_string()), &tz).unwrap();
        assert_eq!(day_key(&parsed), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert!(is_midnight(&parsed));
    }

    #[test]
    fn test_parse_local_datetime() {
        let tz = moscow();
        let parsed =
            parse_date_value(&DateValue::Text("2025-01-15T10:00".to_string()), &tz).unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn test_parse_rfc3339_converts_to_zone() {
        let tz = moscow();
        let parsed =
            parse_date_value(&DateValue::Text("2025-01-15T21:30:00Z".to_string()), &tz).unwrap();
        // Moscow is UTC+3
        assert_eq!(day_key(&parsed), NaiveDate::from_ymd_opt(2025, 1, 16).unwrap());
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn test_parse_millis() {
        let tz: Tz = "UTC".parse().unwrap();
        let parsed = parse_date_value(&DateValue::Millis(1_736_935_200_000), &tz).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2025-01-15 10:00");
    }

    #[test]
    fn test_unparseable_values_are_none() {
        let tz = moscow();
        assert!(parse_date_value(&DateValue::Text("not a date".to_string()), &tz).is_none());
        assert!(parse_date_value(&DateValue::Text(String::new()), &tz).is_none());
        assert!(parse_date_value(&DateValue::Text("2025-02-30".to_string()), &tz).is_none());
        assert!(parse_date_value(&DateValue::Millis(i64::MAX), &tz).is_none());
    }

    #[test]
    fn test_at_time_of_day_keeps_day() {
        let tz = moscow();
        let anchor = parse_date_value(&DateValue::Text("2025-01-15T23:10".to_string()), &tz).unwrap();
        let moved = at_time_of_day(&anchor, NaiveTime::from_hms_opt(7, 45, 0).unwrap()).unwrap();
        assert_eq!(day_key(&moved), day_key(&anchor));
        assert_eq!(format_hm(&moved), "07:45");
    }

    #[test]
    fn test_plain_date_when_midnight_is_skipped() {
        // Cuba moves clocks from 00:00 to 01:00 on 2025-03-09
        let tz: Tz = "America/Havana".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let parsed = parse_date_value(&DateValue::Text("2025-03-09".to_string()), &tz).unwrap();
        assert_eq!(day_key(&parsed), date);
        assert_eq!(parsed.hour(), 1);
        assert_eq!(parsed.minute(), 0);
        assert_eq!(local_midnight(date, &tz), Some(parsed));
    }

    #[test]
    fn test_at_time_of_day_in_dst_gap() {
        // 2025-03-30 02:30 does not exist in Berlin
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let anchor = local_midnight(NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(), &tz).unwrap();
        assert!(at_time_of_day(&anchor, NaiveTime::from_hms_opt(2, 30, 0).unwrap()).is_none());
    }
}
