//! Request-log line parser
//!
//! The request log is free text written by a logging middleware, one line per
//! handled request:
//!
//! ```text
//! 2025-08-14 10:15:30,042 - INFO - GET /api/v1/health status=200 0.001s
//! <timestamp>             - <lvl> - <METHOD> <path> status=<ddd> <float>s
//! ```
//!
//! Recovering structure from that text is inherently brittle: the grammar below
//! is the whole contract with the writer, and this module is the only place it
//! lives. A line that deviates anywhere (a missing field, a four-digit status,
//! a latency without its trailing `s`, an unknown verb) is rejected outright.
//! No field is ever defaulted or repaired, since a coerced line would skew
//! every aggregate computed downstream.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{HttpMethod, RequestEvent};

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})\s+
        (?P<time>[0-9]{2}:[0-9]{2}:[0-9]{2}),(?P<millis>[0-9]{3})
        \s+-\s+\S+\s+-\s+
        (?P<method>GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\s+
        (?P<path>\S+)\s+
        status=(?P<status>[0-9]{3})\s+
        (?P<latency>[0-9]+(?:\.[0-9]+)?)s$",
    )
    .expect("request log grammar is a valid regex")
});

/// Parse one log line into a [`RequestEvent`].
///
/// Returns `None` for any line that does not match the grammar exactly or
/// whose fields fail validation (impossible dates, status outside 100..=599).
/// Surrounding whitespace is ignored.
pub fn parse_line(line: &str) -> Option<RequestEvent> {
    let caps = LINE_RE.captures(line.trim())?;

    let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok()?;
    let millis: u32 = caps["millis"].parse().ok()?;
    let time = NaiveTime::parse_from_str(&caps["time"], "%H:%M:%S").ok()?;
    // chrono reads `:60` as second 59 plus a leap nanosecond overflow
    if time.nanosecond() >= 1_000_000_000 {
        return None;
    }
    let time = time.with_nanosecond(millis * 1_000_000)?;
    let timestamp = NaiveDateTime::new(date, time);

    let method: HttpMethod = caps["method"].parse().ok()?;

    let status: u16 = caps["status"].parse().ok()?;
    if !(100..=599).contains(&status) {
        return None;
    }

    let latency_seconds: f64 = caps["latency"].parse().ok()?;
    if !latency_seconds.is_finite() {
        return None;
    }

    Some(RequestEvent {
        timestamp,
        method,
        path: caps["path"].to_string(),
        status,
        latency_seconds,
    })
}
