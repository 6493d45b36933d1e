// Syslog timestamp reconstruction (month/day/time + fallback year)

use chrono::NaiveDateTime;

use super::ParseError;

/// Map a three-letter month abbreviation to its 1-12 number (case-sensitive)
fn month_number(abbr: &str) -> Option<u32> {
    match abbr {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

/// Resolve a syslog month/day/time triple to a canonical "YYYY-MM-DD HH:MM:SS" string.
///
/// Syslog lines carry no year, so the caller supplies one fallback year for
/// the whole file. Calendar rules are strict: Feb 30 or day 31 in a 30-day
/// month fail with `InvalidTimestamp`.
pub fn resolve_timestamp(
    month_abbr: &str,
    day_str: &str,
    time_str: &str,
    year: i32,
) -> Result<String, ParseError> {
    let month =
        month_number(month_abbr).ok_or_else(|| ParseError::UnknownMonth(month_abbr.to_string()))?;

    let day: u32 = day_str
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp(format!("{month_abbr} {day_str} {time_str}")))?;

    // compose then re-parse, so chrono validates the calendar and the time fields
    let composed = format!("{year:04}-{month:02}-{day:02} {time_str}");
    let dt = NaiveDateTime::parse_from_str(&composed, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| ParseError::InvalidTimestamp(composed.clone()))?;

    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
