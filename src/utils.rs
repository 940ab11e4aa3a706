use chrono::{Duration, NaiveDate};
use rand::{Rng, distr::Alphanumeric};
use serde_json::Number;

use crate::{ExportError, Res};

/// Hours between local time and UTC (Pacific Standard Time).
pub const LOCAL_ZULU_OFFSET: i32 = -8;

/// Date meaning "no cutoff": every real add date lies after it.
pub const LONG_AGO: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => panic!("1900-01-01 is a valid date"),
};

/// Years a cutoff may name.
const CUTOFF_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

const FILENAME_SPECIAL_CHARS: &[char] = &[
    '<', '>', '*', '.', '"', '/', '\\', '[', ']', ':', ';', '|', ',', '?',
];

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Converts a Spotify `added_at` timestamp into the local calendar date.
///
/// Moves the date back one day when the hour, shifted by
/// [`LOCAL_ZULU_OFFSET`], falls before midnight. Minutes and daylight saving
/// are ignored. A bare `YYYY-MM-DD` is returned as is.
pub fn normalize_added_date(timestamp: &str) -> Res<NaiveDate> {
    let malformed = || ExportError::MalformedResponse(format!("bad timestamp: {}", timestamp));

    let (date_part, time_part) = match timestamp.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (timestamp, None),
    };

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| malformed())?;

    let Some(time) = time_part else {
        return Ok(date);
    };

    let hour = time
        .split(':')
        .next()
        .and_then(|h| h.parse::<i32>().ok())
        .ok_or_else(malformed)?;

    if hour + LOCAL_ZULU_OFFSET < 0 {
        date.checked_sub_signed(Duration::days(1))
            .ok_or_else(malformed)
    } else {
        Ok(date)
    }
}

/// Parses a user-entered `MM-DD-YYYY` cutoff date.
///
/// Anything empty or unparsable, including years outside `1..=9999`, yields
/// [`LONG_AGO`], which disables filtering.
pub fn parse_cutoff(input: &str) -> NaiveDate {
    let parts: Vec<&str> = input.trim().split('-').collect();
    if parts.len() < 3 {
        return LONG_AGO;
    }

    let month = parts[0].trim().parse::<u32>();
    let day = parts[1].trim().parse::<u32>();
    let year = parts[2].trim().parse::<i32>();

    match (year, month, day) {
        (Ok(y), Ok(m), Ok(d)) if CUTOFF_YEARS.contains(&y) => {
            NaiveDate::from_ymd_opt(y, m, d).unwrap_or(LONG_AGO)
        }
        _ => LONG_AGO,
    }
}

/// Turns a display name into a file name the common filesystems accept.
///
/// Special characters become `-` first, then spaces become `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(FILENAME_SPECIAL_CHARS, "-").replace(' ', "_")
}

/// Joins names with `", "`; empty input yields an empty string.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a JSON number the way the station's spreadsheets expect it:
/// integers stay integers, floats keep at least one decimal, and magnitudes
/// below 1e-4 use a two-digit exponent (`1.5e-05`).
pub fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    let Some(value) = number.as_f64() else {
        return number.to_string();
    };

    if value == 0.0 {
        return "0.0".to_string();
    }

    let magnitude = value.abs();
    if magnitude < 1e-4 || magnitude >= 1e16 {
        let scientific = format!("{:e}", value);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => scientific,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Shortens `text` to `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
