use std::sync::LazyLock;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone, Timelike,
    Utc,
};
use chrono_tz::Tz;
use regex::Regex;

pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

pub const SYMBOLIC_INTERVALS: &[&str] = &["@hourly", "@daily", "@weekly", "@monthly", "@yearly"];

// minute, hour, day of month, month, day of week
const CRON_FIELD_RANGES: [(u32, u32); 5] = [(0, 59), (0, 23), (1, 31), (1, 12), (0, 6)];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

static EVERY_INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@every (\d+(ns|us|µs|ms|s|m|h))+").expect("@every interval pattern")
});

pub fn is_valid_interval(interval: &str) -> bool {
    is_symbolic_interval(interval) || is_cron_expression(interval) || is_every_interval(interval)
}

pub fn is_symbolic_interval(interval: &str) -> bool {
    SYMBOLIC_INTERVALS.contains(&interval)
}

pub fn is_every_interval(interval: &str) -> bool {
    EVERY_INTERVAL.is_match(interval)
}

/// Five space-separated fields, each `*` or one in-range value written
/// without leading zeros. Steps, ranges and lists are not accepted.
pub fn is_cron_expression(interval: &str) -> bool {
    let fields: Vec<&str> = interval.split(' ').map(str::trim).collect();
    if fields.len() != CRON_FIELD_RANGES.len() {
        return false;
    }
    fields
        .iter()
        .zip(CRON_FIELD_RANGES)
        .all(|(field, (min, max))| is_cron_field(field, min, max))
}

fn is_cron_field(field: &str, min: u32, max: u32) -> bool {
    if field == "*" {
        return true;
    }
    if field.is_empty() || !field.bytes().all(|byte| byte.is_ascii_digit()) {
        return false;
    }
    match field.parse::<u32>() {
        Ok(value) => (min..=max).contains(&value) && value.to_string() == field,
        Err(_) => false,
    }
}

/// Parse a schedule start. Timestamps without an offset are read as wall
/// time in the reference timezone.
pub fn parse_start_date(raw: &str) -> Result<DateTime<Tz>, String> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(localize(parsed.with_timezone(&Utc)));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Ok(localize(parsed.with_timezone(&Utc)));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return from_reference_wall_time(naive);
        }
    }
    for format in DATE_FORMATS {
        let midnight = NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
        if let Some(midnight) = midnight {
            return from_reference_wall_time(midnight);
        }
    }
    Err(format!("Unknown string format: {trimmed}"))
}

/// Wall times skipped by a DST jump are moved forward by the length of the
/// gap (one hour in the reference timezone).
fn from_reference_wall_time(naive: NaiveDateTime) -> Result<DateTime<Tz>, String> {
    let resolved = match REFERENCE_TIMEZONE.from_local_datetime(&naive) {
        LocalResult::None => REFERENCE_TIMEZONE
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
        local => local.earliest(),
    };
    resolved
        .map(round_up_to_five_minutes)
        .ok_or_else(|| format!("{naive} does not exist in {REFERENCE_TIMEZONE}"))
}

pub fn localize(instant: DateTime<Utc>) -> DateTime<Tz> {
    round_up_to_five_minutes(instant.with_timezone(&REFERENCE_TIMEZONE))
}

/// Seconds are dropped and the minute moves up to the next multiple of five.
pub fn round_up_to_five_minutes<T: TimeZone>(instant: DateTime<T>) -> DateTime<T> {
    let (minute, second, nanosecond) = (instant.minute(), instant.second(), instant.nanosecond());
    let rounded = minute.div_ceil(5) * 5;
    instant - TimeDelta::seconds(i64::from(second)) - TimeDelta::nanoseconds(i64::from(nanosecond))
        + TimeDelta::minutes(i64::from(rounded - minute))
}

pub fn default_start_date() -> DateTime<Tz> {
    localize(Utc::now())
}

pub fn format_start_date(instant: &DateTime<Tz>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}
