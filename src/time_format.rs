//! Human-readable time labels for chat messages.
//!
//! Every function takes the reference time (or the timezone) explicitly. The
//! timezone of `now` is treated as the local timezone for calendar-day logic.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, TimeZone};

const SECONDS_PER_DAY: i64 = 86_400;
const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1_440;

/// Reference time from the system clock in the local timezone.
pub fn now_local() -> DateTime<Local> {
    Local::now()
}

/// Negative or unrepresentable timestamps carry no usable time.
fn to_zoned<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    if timestamp < 0 {
        return None;
    }
    tz.timestamp_opt(timestamp, 0).single()
}

/// Check whether two Unix timestamps fall on the same calendar day in `tz`.
///
/// Negative timestamps and timestamps outside chrono's range never match.
pub fn is_same_calendar_day<Tz: TimeZone>(t1: i64, t2: i64, tz: &Tz) -> bool {
    match (to_zoned(t1, tz), to_zoned(t2, tz)) {
        (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
        _ => false,
    }
}

fn is_today<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> bool {
    is_same_calendar_day(timestamp, now.timestamp(), &now.timezone())
}

fn is_yesterday<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> bool {
    is_same_calendar_day(
        timestamp,
        now.timestamp().saturating_sub(SECONDS_PER_DAY),
        &now.timezone(),
    )
}

/// Label for the separator shown above the first group of a day.
///
/// Returns `"Today"`, `"Yesterday"`, or a long date such as `"March 4, 2024"`.
pub fn format_date_separator<Tz>(timestamp: i64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if is_today(timestamp, now) {
        return "Today".to_string();
    }
    if is_yesterday(timestamp, now) {
        return "Yesterday".to_string();
    }
    to_zoned(timestamp, &now.timezone())
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Short time shown next to a message.
///
/// Recent messages (today or yesterday) get `HH:MM`; anything older gets
/// `MM/DD/YYYY, HH:MM` so it can be placed without the separator.
pub fn format_message_time<Tz>(timestamp: i64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(dt) = to_zoned(timestamp, &now.timezone()) else {
        return String::new();
    };
    if is_today(timestamp, now) || is_yesterday(timestamp, now) {
        dt.format("%H:%M").to_string()
    } else {
        dt.format("%m/%d/%Y, %H:%M").to_string()
    }
}

/// Full absolute timestamp for tooltips, e.g.
/// `"Monday, March 4, 2024 at 14:05:09"`.
pub fn format_detailed_timestamp<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_zoned(timestamp, tz)
        .map(|dt| dt.format("%A, %B %-d, %Y at %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Approximate age from a confirmation count (1 confirmation ≈ 1 minute).
///
/// Tiers are floored. Missing or negative counts yield an empty label.
pub fn format_relative_time_from_confirmations(confirmations: Option<i64>) -> String {
    let Some(c) = confirmations.filter(|&c| c >= 0) else {
        return String::new();
    };
    if c <= 1 {
        "Just now".to_string()
    } else if c < MINUTES_PER_HOUR {
        format!("{}m ago", c)
    } else if c < MINUTES_PER_DAY {
        format!("{}h ago", c / MINUTES_PER_HOUR)
    } else {
        format!("{}d ago", c / MINUTES_PER_DAY)
    }
}

/// Age of an absolute timestamp relative to `now`.
///
/// Tiers are chosen after rounding, so 59m30s reads `"1h ago"` rather than
/// `"60m ago"`. Past 24 rounded hours the label becomes `"Yesterday"` or an
/// absolute `MM/DD` (`MM/DD/YYYY` when the year differs from `now`). Missing,
/// negative or unrepresentable timestamps yield an empty label.
pub fn format_relative_time_from_timestamp<Tz>(timestamp: Option<i64>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(ts) = timestamp else {
        return String::new();
    };
    let Some(dt) = to_zoned(ts, &now.timezone()) else {
        return String::new();
    };
    let delta = now.timestamp().saturating_sub(ts).max(0);

    if delta < 60 {
        return "Just now".to_string();
    }
    let minutes = rounded_div(delta, 60);
    if minutes < MINUTES_PER_HOUR {
        return format!("{}m ago", minutes);
    }
    let hours = rounded_div(delta, 3_600);
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    if is_yesterday(ts, now) {
        return "Yesterday".to_string();
    }

    if dt.year() == now.year() {
        dt.format("%m/%d").to_string()
    } else {
        dt.format("%m/%d/%Y").to_string()
    }
}

/// Integer division rounding half away from zero, for non-negative inputs.
fn rounded_div(value: i64, divisor: i64) -> i64 {
    value.saturating_add(divisor / 2) / divisor
}
