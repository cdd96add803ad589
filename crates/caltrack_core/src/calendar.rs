//! Calendar date rules for event dates.
//!
//! # Responsibility
//! - Decide leap years and month lengths on the proleptic Gregorian calendar.
//! - Accept or reject `YYYY-MM-DD` text without consulting a platform parser.
//!
//! # Invariants
//! - All functions are pure.
//! - Only fixed-width ASCII text is accepted, so lexical order of accepted
//!   dates equals chronological order.

use once_cell::sync::Lazy;
use regex::Regex;

static DATE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date shape regex")
});

/// Returns whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Returns the number of days in `month` of `year`.
///
/// Returns `0` for a month outside `1..=12` instead of failing.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parses strict `YYYY-MM-DD` text into `(year, month, day)`.
///
/// Returns `None` on any width, separator, digit or range violation.
/// Partial parses are never accepted: `2025-1-1` is rejected.
pub fn parse_date(text: &str) -> Option<(i32, u32, u32)> {
    let caps = DATE_SHAPE_RE.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    if year < 1 || !(1..=12).contains(&month) {
        return None;
    }
    if day < 1 || day > days_in_month(year, month) {
        return None;
    }

    Some((year, month, day))
}

/// Returns whether `text` is a well-formed, in-range `YYYY-MM-DD` date.
pub fn is_valid_date(text: &str) -> bool {
    parse_date(text).is_some()
}
