//! Minute-precision timestamps in a fixed UTC offset, and the exam countdown
//! label shown next to the title.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub const DEFAULT_UTC_OFFSET: &str = "+08:00";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d  %H:%M";
const MAX_OFFSET_HOURS: i32 = 14;

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM`, `+HH`, `Z` or `UTC`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "zero offset rejected".to_string());
    }

    let invalid = || format!("invalid UTC offset '{raw}', expected a value like +08:00 or -05:30");

    let (sign, rest) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

pub fn format_timestamp(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// `D-12` before the target date, `D-Day` on it, `D+3` after it.
pub fn countdown_label(today: NaiveDate, target: NaiveDate) -> String {
    let days = target.signed_duration_since(today).num_days();
    match days {
        0 => "D-Day".to_string(),
        d if d > 0 => format!("D-{d}"),
        d => format!("D+{}", -d),
    }
}
