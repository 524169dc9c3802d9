//! crates/tutor_portal_core/src/time.rs
//!
//! Normalises the time and date shapes the remote sheets hand back
//! (12-hour strings, ISO datetimes, fractional-day numbers) into canonical
//! 24-hour values, and formats canonical values back into the remote form.
//!
//! Every function here is best-effort: bad input falls back to a default or
//! is passed through untouched, it never fails.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Canonical time used when a remote value is missing or unparseable.
pub const DEFAULT_TIME: &str = "09:00";

/// Remote form of [`DEFAULT_TIME`].
pub const DEFAULT_API_TIME: &str = "09:00 am";

/// Duration assumed when a session's times cannot be read.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[:.](\d{1,2})(\s*(am|pm))?").expect("clock pattern is valid")
});

//=========================================================================================
// Raw Time Values
//=========================================================================================

/// A time-of-day value exactly as a remote sheet returned it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TimeValue {
    #[default]
    Missing,
    /// Sheets encode bare times as a fraction of a day.
    Fraction(f64),
    Text(String),
}

impl TimeValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, TimeValue::Missing)
    }

    /// The raw text the remote sent, used when a value is echoed verbatim.
    pub fn as_text(&self) -> String {
        match self {
            TimeValue::Missing => String::new(),
            TimeValue::Fraction(f) => f.to_string(),
            TimeValue::Text(s) => s.clone(),
        }
    }
}

impl From<&serde_json::Value> for TimeValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TimeValue::Missing,
            serde_json::Value::Number(n) => n.as_f64().map_or(TimeValue::Missing, TimeValue::Fraction),
            serde_json::Value::String(s) if s.trim().is_empty() => TimeValue::Missing,
            serde_json::Value::String(s) => TimeValue::Text(s.clone()),
            other => TimeValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            TimeValue::Missing
        } else {
            TimeValue::Text(value.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(TimeValue::from(&value))
    }
}

//=========================================================================================
// Clock Times
//=========================================================================================

/// A 24-hour time of day. Hours are not range-checked; `25:70` survives
/// parsing the same way it would be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    fn from_minutes(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hour: (total / 60) as u32,
            minute: (total % 60) as u32,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Reads a clock time out of any of the remote shapes, in local time.
pub fn parse_clock(value: &TimeValue) -> Option<ClockTime> {
    parse_clock_in(value, &Local)
}

pub(crate) fn parse_clock_in<Tz: TimeZone>(value: &TimeValue, tz: &Tz) -> Option<ClockTime> {
    match value {
        TimeValue::Missing => None,
        TimeValue::Fraction(fraction) => Some(ClockTime::from_minutes(
            (fraction * MINUTES_PER_DAY as f64).round() as i64,
        )),
        TimeValue::Text(text) => parse_clock_text(text.trim(), tz),
    }
}

fn parse_clock_text<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<ClockTime> {
    if text.contains(|c: char| c == 'T' || c == 't') {
        if let Some(instant) = parse_iso_datetime(text, tz) {
            return Some(ClockTime::new(instant.hour(), instant.minute()));
        }
    }

    let lowered = text.to_lowercase();
    let captures = CLOCK_PATTERN.captures(&lowered)?;
    let mut hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = captures[2].parse().ok()?;
    match captures.get(4).map(|m| m.as_str()) {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }
    Some(ClockTime::new(hour, minute))
}

/// Parses an ISO-8601 datetime. Values carrying an offset are converted into
/// `tz`; naive values are taken as already local.
fn parse_iso_datetime<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDateTime> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(tz).naive_local());
    }
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").ok())
}

//=========================================================================================
// Canonical <-> Remote Conversions
//=========================================================================================

/// Converts any remote time value into a 24-hour `HH:MM` string.
///
/// Missing or unreadable values become [`DEFAULT_TIME`].
pub fn to_24h(value: &TimeValue) -> String {
    to_24h_in(value, &Local)
}

pub(crate) fn to_24h_in<Tz: TimeZone>(value: &TimeValue, tz: &Tz) -> String {
    parse_clock_in(value, tz).map_or_else(|| DEFAULT_TIME.to_string(), |clock| clock.to_string())
}

/// Converts a 24-hour `HH:MM` string into the remote `hh:mm am` form.
pub fn to_api_time(time_24h: &str) -> String {
    let Some((hours, minutes)) = time_24h.trim().split_once(':') else {
        return DEFAULT_API_TIME.to_string();
    };
    let (Ok(mut hour), Ok(minute)) = (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>())
    else {
        return DEFAULT_API_TIME.to_string();
    };

    let mut modifier = "am";
    if hour >= 12 {
        modifier = "pm";
        if hour > 12 {
            hour -= 12;
        }
    }
    if hour == 0 {
        hour = 12;
    }
    format!("{:02}:{:02} {}", hour, minute, modifier)
}

/// Minutes between two times of day. A negative span wraps past midnight;
/// an unreadable endpoint yields [`DEFAULT_DURATION_MINUTES`].
pub fn duration_minutes(start: &TimeValue, end: &TimeValue) -> u32 {
    match (parse_clock(start), parse_clock(end)) {
        (Some(start), Some(end)) => span_minutes(start, end),
        _ => DEFAULT_DURATION_MINUTES,
    }
}

fn span_minutes(start: ClockTime, end: ClockTime) -> u32 {
    let mut diff = end.minutes_since_midnight() - start.minutes_since_midnight();
    if diff < 0 {
        diff += MINUTES_PER_DAY;
    }
    diff as u32
}

//=========================================================================================
// Dates and Start Instants
//=========================================================================================

/// The start of a session. Remote dates that cannot be read are kept as-is
/// rather than dropped, and sort after every readable instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartInstant {
    At(NaiveDateTime),
    Unparsed(String),
}

impl StartInstant {
    pub fn at(&self) -> Option<NaiveDateTime> {
        match self {
            StartInstant::At(instant) => Some(*instant),
            StartInstant::Unparsed(_) => None,
        }
    }
}

impl Ord for StartInstant {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (StartInstant::At(a), StartInstant::At(b)) => a.cmp(b),
            (StartInstant::At(_), StartInstant::Unparsed(_)) => Ordering::Less,
            (StartInstant::Unparsed(_), StartInstant::At(_)) => Ordering::Greater,
            (StartInstant::Unparsed(a), StartInstant::Unparsed(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for StartInstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StartInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartInstant::At(instant) => write!(f, "{}", instant.format("%Y-%m-%d %H:%M")),
            StartInstant::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Reads `DD/MM/YYYY`, `YYYY-MM-DD` or an ISO datetime.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    parse_date_in(text, &Local)
}

pub(crate) fn parse_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains('/') {
        let parts: Vec<&str> = text.split('/').collect();
        if let [day, month, year] = parts.as_slice() {
            if let (Ok(day), Ok(month), Ok(year)) = (
                day.trim().parse::<u32>(),
                month.trim().parse::<u32>(),
                year.trim().parse::<i32>(),
            ) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(date.and_time(NaiveTime::MIN));
                }
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    parse_iso_datetime(text, tz)
}

/// Combines a remote date column and a time-of-day column into one instant.
/// An unreadable time leaves the date's own time of day in place.
pub fn combine_date_time(date: &str, time: &TimeValue) -> StartInstant {
    combine_date_time_in(date, time, &Local)
}

pub(crate) fn combine_date_time_in<Tz: TimeZone>(
    date: &str,
    time: &TimeValue,
    tz: &Tz,
) -> StartInstant {
    let Some(day) = parse_date_in(date, tz) else {
        return StartInstant::Unparsed(date.to_string());
    };
    match parse_clock_in(time, tz) {
        Some(clock) => NaiveTime::from_hms_opt(clock.hour, clock.minute, 0)
            .map(|t| StartInstant::At(day.date().and_time(t)))
            .unwrap_or(StartInstant::At(day)),
        None => StartInstant::At(day),
    }
}

/// Allocation start dates: `-`/empty stay `-`, readable dates become
/// `YYYY-MM-DD`, anything else is returned unchanged.
pub fn format_api_date(text: &str) -> String {
    if text.is_empty() || text == "-" {
        return "-".to_string();
    }
    parse_date(text).map_or_else(|| text.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Allocation times: `-`/empty stay `-`, ISO datetimes become `hh:mmam`,
/// anything else (already `07:00pm` style) is returned unchanged.
pub fn format_api_time(text: &str) -> String {
    format_api_time_in(text, &Local)
}

pub(crate) fn format_api_time_in<Tz: TimeZone>(text: &str, tz: &Tz) -> String {
    if text.is_empty() || text == "-" {
        return "-".to_string();
    }
    parse_iso_datetime(text.trim(), tz)
        .map_or_else(|| text.to_string(), |t| t.format("%I:%M%P").to_string())
}
