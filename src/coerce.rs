//! Lossy coercion of hand-edited document fields into typed values.
//!
//! Backlog documents are edited by people, so every coercion here degrades to
//! `None` instead of raising an error: a malformed point estimate or a garbage
//! timestamp must never abort a load.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d{2,4})[-/.])?(\d{1,2})[-/.](\d{1,2})(.*)$").expect("valid date regex")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})[:,.](\d{1,2})(?:[:,.](\d{1,2}))?\s*$").expect("valid time regex")
});

static COMPACT_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{2})(\d{2})?(\d{2})?\s*$").expect("valid compact time regex"));

/// Stringify and trim a scalar node. Empty text, null, and structured nodes
/// all come back as `None`.
pub fn as_text(node: &Value) -> Option<String> {
    let raw = match node {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim and parse a scalar node as a base-10 integer. Non-numeric text is
/// absent, not an error.
pub fn as_integer(node: &Value) -> Option<i64> {
    as_text(node)?.parse::<i64>().ok()
}

/// Heuristic timestamp parser for free-form `record-time` fields.
///
/// Two sequential passes: a date pass (optional 2-4 digit year, then
/// month/day, with `-`, `/`, `.` separators) whose trailing remainder feeds a
/// time pass (`H:M[:S]` with `:`, `,`, `.` separators, falling back to compact
/// 2-digit `HHMMSS` groups). A missing date defaults to today; a missing time
/// defaults to midnight; when neither pass matches the result is absent.
pub fn as_datetime(node: &Value) -> Option<NaiveDateTime> {
    let raw = as_text(node)?;

    let today = Local::now().date_naive();
    let (date, rest, date_matched) = match DATE_RE.captures(&raw) {
        Some(caps) => {
            let year = match caps.get(1) {
                Some(y) => normalize_year(y.as_str().parse().ok()?),
                None => today.year(),
            };
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            let rest = caps.get(4).map_or("", |m| m.as_str()).to_string();
            (NaiveDate::from_ymd_opt(year, month, day)?, rest, true)
        }
        None => (today, raw.clone(), false),
    };

    let (time, time_matched) = match parse_time(&rest) {
        Some(time) => (time, true),
        None => (NaiveTime::MIN, false),
    };

    if !date_matched && !time_matched {
        return None;
    }
    Some(date.and_time(time))
}

/// Case-insensitive keyword prefix test, used for DONE-status detection.
pub fn has_prefix_word(subject: &str, keyword: &str) -> bool {
    subject
        .trim_start()
        .get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

fn parse_time(rest: &str) -> Option<NaiveTime> {
    if let Some(caps) = TIME_RE.captures(rest) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        return NaiveTime::from_hms_opt(hour, minute, second);
    }
    let caps = COMPACT_TIME_RE.captures(rest)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Two-digit years below 70 are 2000s, anything below 1000 is 1900s.
fn normalize_year(year: i32) -> i32 {
    if year < 70 {
        year + 2000
    } else if year < 1000 {
        year + 1900
    } else {
        year
    }
}
