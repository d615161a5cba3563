//! Utility functions for the cafe_forecast crate

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parse a calendar date, accepting plain dates and date-times
///
/// Date-times are reduced to their calendar date. Returns `None` for
/// anything that does not parse.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a time of day
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}
