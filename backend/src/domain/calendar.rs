//! Local-day arithmetic for the daily checklist.
//!
//! A "day key" identifies a calendar day in the observer's local timezone and
//! is what the rollover marker and history entries are keyed by. Day keys are
//! written as `YYYY-MM-DD`; the `Sun Jun 02 2024` form written by older
//! versions of the app is still accepted when reading.

use chrono::{DateTime, Duration, Local, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::time::Duration as StdDuration;

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
const LEGACY_DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// The timer is never armed for less than this
pub const MIN_ROLLOVER_DELAY: StdDuration = StdDuration::from_secs(1);

/// Format a local day as a day key
pub fn format_day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a stored day key, None if it is in neither known format
pub fn parse_day_key(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DAY_KEY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, LEGACY_DAY_KEY_FORMAT))
        .ok()
}

/// Human-readable date for the checklist header, e.g. "Sunday, June 2, 2024"
pub fn format_date_for_display(day: NaiveDate) -> String {
    day.format("%A, %B %-d, %Y").to_string()
}

/// The first instant of the next local day.
///
/// When local midnight falls into a DST gap the first valid instant after it
/// is used; when it is ambiguous the earlier one wins.
pub fn next_local_midnight(now: &DateTime<Local>) -> DateTime<Local> {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    first_instant_from(tomorrow.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| *now + Duration::hours(24))
}

fn first_instant_from(mut candidate: NaiveDateTime) -> Option<DateTime<Local>> {
    // DST gaps are at most a couple of hours wide
    for _ in 0..(4 * 24) {
        match Local.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return Some(instant),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest),
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    None
}

/// How long to wait from `now` until the next local day begins
pub fn duration_until_next_midnight(now: &DateTime<Local>) -> StdDuration {
    next_local_midnight(now)
        .signed_duration_since(*now)
        .to_std()
        .unwrap_or(MIN_ROLLOVER_DELAY)
        .max(MIN_ROLLOVER_DELAY)
}

/// The oldest day still retained when keeping `months` calendar months of history.
///
/// Month arithmetic clamps to the end of shorter months (Mar 31 -> Feb 29).
pub fn retention_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
