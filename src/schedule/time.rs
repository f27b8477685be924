//! Time-of-day helpers shared by the importer, the projector and the views.
//!
//! Times travel as `HH:MM` strings (24-hour, zero-padded) so they sort
//! lexicographically. Parsing is lenient about a missing leading zero;
//! validity checks are not.

use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})\s*(AM|PM)?")
        .expect("valid time range pattern")
});

/// Start and end of a parsed range. Both are empty when the text did not
/// match, which means "unparsed", never midnight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn is_parsed(&self) -> bool {
        !self.start.is_empty()
    }
}

/// Parse `H:MM - H:MM [AM|PM]`.
///
/// A trailing meridiem applies to both ends and converts them to 24-hour
/// form. Without one the matched text passes through unchanged, so
/// `"1:00 - 1:10"` yields `1:00` / `1:10`.
pub fn parse_time_range(text: &str) -> TimeRange {
    let Some(caps) = TIME_RANGE.captures(text) else {
        return TimeRange::default();
    };

    let start = &caps[1];
    let end = &caps[2];

    match caps.get(3) {
        Some(meridiem) => {
            let pm = meridiem.as_str().eq_ignore_ascii_case("PM");
            TimeRange {
                start: to_24_hour(start, pm),
                end: to_24_hour(end, pm),
            }
        }
        None => TimeRange {
            start: start.to_string(),
            end: end.to_string(),
        },
    }
}

fn to_24_hour(time: &str, pm: bool) -> String {
    let (hour, minutes) = time.split_once(':').unwrap_or((time, "00"));
    let hour: u32 = hour.parse().unwrap_or(0);
    let hour = match (pm, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    };
    format!("{:02}:{}", hour, minutes)
}

/// Minutes since midnight, or `None` for anything that is not a time of day.
pub fn minutes_of(time: &str) -> Option<u32> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(parsed.hour() * 60 + parsed.minute())
}

/// Strict `HH:MM` check: fixed width, zero-padded, 24-hour.
pub fn is_valid_hhmm(time: &str) -> bool {
    time.len() == 5 && time.as_bytes()[2] == b':' && minutes_of(time).is_some()
}

/// Render `HH:MM` as a 12-hour clock string (`13:05` -> `1:05 PM`).
/// Returns an empty string for input that is not a time.
pub fn format_time(time: &str) -> String {
    let Some(minutes) = minutes_of(time) else {
        return String::new();
    };
    let (hour, minute) = (minutes / 60, minutes % 60);
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, meridiem)
}

/// Vertical offset of `time` on a grid that starts at `grid_start_hour`.
///
/// Times outside the displayed window still produce a value (possibly
/// negative); clipping is the view's job. Unparseable times sit at `0.0`.
pub fn time_to_offset(time: &str, grid_start_hour: u32, pixels_per_hour: f64) -> f64 {
    match minutes_of(time) {
        Some(minutes) => {
            let since_start = minutes as f64 - (grid_start_hour * 60) as f64;
            since_start / 60.0 * pixels_per_hour
        }
        None => 0.0,
    }
}

/// Height of a slot spanning `start..end`, never below `min_height`.
/// A missing or unparseable `end` counts as zero duration.
pub fn slot_height(start: &str, end: Option<&str>, pixels_per_hour: f64, min_height: f64) -> f64 {
    let Some(start_minutes) = minutes_of(start) else {
        return min_height;
    };
    let end_minutes = end.and_then(minutes_of).unwrap_or(start_minutes);
    let span = (end_minutes as f64 - start_minutes as f64) / 60.0 * pixels_per_hour;
    span.max(min_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_range_with_am_pads_hours() {
        let range = parse_time_range("8:30 - 8:50 AM");
        assert_eq!(range.start, "08:30");
        assert_eq!(range.end, "08:50");
    }

    #[test]
    fn parse_range_with_pm_adds_twelve() {
        let range = parse_time_range("1:00 - 1:45 pm");
        assert_eq!(range.start, "13:00");
        assert_eq!(range.end, "13:45");
    }

    #[test]
    fn parse_range_noon_and_midnight() {
        assert_eq!(parse_time_range("12:10 - 12:40 PM").start, "12:10");
        assert_eq!(parse_time_range("12:10 - 12:40 AM").start, "00:10");
    }

    #[test]
    fn parse_range_without_meridiem_passes_through() {
        let range = parse_time_range("1:00 - 1:10");
        assert_eq!(range.start, "1:00");
        assert_eq!(range.end, "1:10");
    }

    #[test]
    fn parse_range_tolerates_tight_spacing() {
        let range = parse_time_range("9:20-9:40AM");
        assert_eq!(range.start, "09:20");
        assert_eq!(range.end, "09:40");
    }

    #[test]
    fn parse_range_garbage_is_empty() {
        let range = parse_time_range("garbage");
        assert_eq!(range, TimeRange::default());
        assert!(!range.is_parsed());
    }

    #[test]
    fn format_time_display_conventions() {
        assert_eq!(format_time("00:00"), "12:00 AM");
        assert_eq!(format_time("12:00"), "12:00 PM");
        assert_eq!(format_time("13:05"), "1:05 PM");
        assert_eq!(format_time("09:30"), "9:30 AM");
        assert_eq!(format_time("23:59"), "11:59 PM");
    }

    #[test]
    fn format_time_of_empty_is_empty() {
        assert_eq!(format_time(""), "");
        assert_eq!(format_time("nope"), "");
    }

    #[test]
    fn hhmm_validity_is_strict() {
        assert!(is_valid_hhmm("08:30"));
        assert!(is_valid_hhmm("23:59"));
        assert!(!is_valid_hhmm("8:30"));
        assert!(!is_valid_hhmm("24:00"));
        assert!(!is_valid_hhmm("08:60"));
        assert!(!is_valid_hhmm(""));
    }

    #[test]
    fn offset_is_linear_from_grid_start() {
        assert_eq!(time_to_offset("08:00", 8, 60.0), 0.0);
        assert_eq!(time_to_offset("09:30", 8, 60.0), 90.0);
        assert_eq!(time_to_offset("10:15", 8, 4.0), 9.0);
    }

    #[test]
    fn offset_outside_window_is_not_clamped() {
        assert_eq!(time_to_offset("07:00", 8, 60.0), -60.0);
        assert_eq!(time_to_offset("23:00", 8, 10.0), 150.0);
    }

    #[test]
    fn slot_height_uses_duration_and_floor() {
        assert_eq!(slot_height("09:00", Some("10:30"), 60.0, 20.0), 90.0);
        assert_eq!(slot_height("09:00", Some("09:05"), 60.0, 20.0), 20.0);
    }

    #[test]
    fn slot_height_without_end_is_min_height() {
        assert_eq!(slot_height("09:00", None, 60.0, 24.0), 24.0);
        assert_eq!(slot_height("09:00", Some(""), 60.0, 24.0), 24.0);
    }

    proptest! {
        #[test]
        fn format_time_is_total_on_valid_times(hour in 0u32..24, minute in 0u32..60) {
            let time = format!("{:02}:{:02}", hour, minute);
            let shown = format_time(&time);
            prop_assert!(shown.ends_with(" AM") || shown.ends_with(" PM"));
            let minute_part = format!(":{:02} ", minute);
            prop_assert!(shown.contains(&minute_part));
        }
    }
}
