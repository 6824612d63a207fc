//! Human readable renderings of tick values.

use crate::ticks::Ticks;
use chrono::{DateTime, TimeZone};

fn split(ticks: Ticks) -> (u64, u64, u64) {
    let total_seconds = ticks.to_millis() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    (hours, minutes, secs)
}

/// `HH:MM:SS`, always with hours. Used by the scrubber bubble and the
/// position readout.
pub fn clock_display(ticks: Ticks) -> String {
    let (hours, minutes, secs) = split(ticks);
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Whole minutes, with the hour only split out once past the hour mark.
/// Exactly sixty minutes stays as `60` to match server-side listings.
fn hours_and_minutes(ticks: Ticks) -> (Option<u64>, u64) {
    let total_minutes = ticks.to_millis() / 1000 / 60;
    if total_minutes > 60 {
        (Some(total_minutes / 60), total_minutes % 60)
    } else {
        (None, total_minutes)
    }
}

/// `1hr 32min` or `45min`.
pub fn runtime(ticks: Ticks) -> String {
    match hours_and_minutes(ticks) {
        (Some(h), m) => format!("{h}hr {m}min"),
        (None, m) => format!("{m}min"),
    }
}

/// `1 hour 32 minutes` or `45 minutes`.
pub fn runtime_full(ticks: Ticks) -> String {
    match hours_and_minutes(ticks) {
        (Some(h), m) => format!("{h} hour {m} minutes"),
        (None, m) => format!("{m} minutes"),
    }
}

/// `1h 32m` or `45m`.
pub fn runtime_compact(ticks: Ticks) -> String {
    match hours_and_minutes(ticks) {
        (Some(h), m) => format!("{h}h {m}m"),
        (None, m) => format!("{m}m"),
    }
}

/// Track length style: `1:02:09` or `3:07`.
pub fn runtime_music(ticks: Ticks) -> String {
    let secs = (ticks.to_millis() / 1000) % 60;
    match hours_and_minutes(ticks) {
        (Some(h), m) => format!("{h}:{m:02}:{secs:02}"),
        (None, m) => format!("{m}:{secs:02}"),
    }
}

/// Wall-clock time at which `remaining` will have elapsed from `now`,
/// formatted as `HH:MM`.
pub fn ends_at<Tz>(now: DateTime<Tz>, remaining: Ticks) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let millis = i64::try_from(remaining.to_millis()).unwrap_or(i64::MAX);
    let end = chrono::TimeDelta::try_milliseconds(millis)
        .and_then(|delta| now.clone().checked_add_signed(delta))
        .unwrap_or(now);
    end.format("%H:%M").to_string()
}
