//! # Release Date Resolution
//!
//! Album release dates arrive as free-form tag strings: `"1999"`,
//! `"2004-06-01"`, `"1993.10.18"`, and occasionally garbage. This module
//! normalizes every input to a single sortable integer, the Unix epoch of
//! UTC midnight on the resolved date, so chronological album ordering is a
//! plain integer comparison.
//!
//! ## Resolution Rules
//!
//! - **Bare years**: `"1999"` resolves to 1999-01-01.
//! - **Delimited dates**: split on `-`, falling back to `.`; missing month
//!   and day components default to 1.
//! - **Component correction**: a year outside 1..=9999, a month outside
//!   1..=12, or a day outside 1..=31 is individually reset to 1 before
//!   conversion.
//! - **Unresolvable input**: strings with no usable digits, components that
//!   fail to parse, and corrected dates that still name a day the calendar
//!   does not have (February 31st) all resolve to [`LONG_TIME_AGO`].
//!
//! The sentinel is smaller than every representable date, so undated albums
//! sort to the front of any ascending chronological listing.

/// Sentinel epoch for albums whose release date is missing or unresolvable.
///
/// Chosen well below the year-1 epoch so sentinel albums always sort first.
pub const LONG_TIME_AGO: i64 = -99_999_999_999;

const SECONDS_PER_DAY: i64 = 86_400;

/// Resolve a raw date tag value to a UTC midnight epoch.
///
/// Never fails: inputs that cannot be resolved yield [`LONG_TIME_AGO`].
///
/// # Examples
///
/// ```
/// use minuet::dates::{resolve_epoch, LONG_TIME_AGO};
///
/// assert_eq!(resolve_epoch("1999"), 915_148_800);
/// assert_eq!(resolve_epoch("1999"), resolve_epoch("1999-01-01"));
/// assert_eq!(resolve_epoch("2004-02-31"), LONG_TIME_AGO);
/// ```
#[must_use]
pub fn resolve_epoch(raw: &str) -> i64 {
    let raw = raw.trim();

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        // Oversized digit runs overflow i64; they are out of range either way.
        let year = raw.parse::<i64>().unwrap_or(i64::MAX);
        return civil_midnight_epoch(clamp_year(year), 1, 1);
    }

    let parts: Vec<&str> = if raw.contains('-') {
        raw.split('-').collect()
    } else if raw.contains('.') {
        raw.split('.').collect()
    } else {
        // No delimiter at all: salvage a leading digit run as a bare year.
        let digits = &raw[..raw.bytes().take_while(u8::is_ascii_digit).count()];
        return match digits.parse::<i64>() {
            Ok(year) => civil_midnight_epoch(clamp_year(year), 1, 1),
            Err(_) => LONG_TIME_AGO,
        };
    };

    // Year, month, day; absent components default to 1.
    let mut components = [1_i64; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        match part.trim().parse::<i64>() {
            Ok(value) => *slot = value,
            Err(_) => return LONG_TIME_AGO,
        }
    }

    let year = clamp_year(components[0]);
    let month = reset_out_of_range(components[1], 12);
    let day = reset_out_of_range(components[2], 31);

    // The 1..=31 day correction still admits days the month does not have.
    if day > days_in_month(year, month) {
        return LONG_TIME_AGO;
    }

    civil_midnight_epoch(year, month, day)
}

/// Render the year of a resolved epoch for display.
///
/// The sentinel renders as `"0"`, matching its role as "unknown release
/// year"; every other epoch renders as its UTC calendar year.
#[must_use]
pub fn epoch_display_year(epoch: i64) -> String {
    if epoch == LONG_TIME_AGO {
        return "0".to_string();
    }
    year_of_epoch(epoch).to_string()
}

fn clamp_year(year: i64) -> i64 {
    if (1..=9999).contains(&year) {
        year
    } else {
        1
    }
}

fn reset_out_of_range(value: i64, max: i64) -> i64 {
    if (1..=max).contains(&value) {
        value
    } else {
        1
    }
}

fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Days between 1970-01-01 and the given proleptic Gregorian date.
///
/// Howard Hinnant's `days_from_civil`, exact over the full year range this
/// module accepts (1..=9999).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_midnight_epoch(year: i64, month: i64, day: i64) -> i64 {
    days_from_civil(year, month, day) * SECONDS_PER_DAY
}

/// UTC calendar year of an epoch (inverse of [`days_from_civil`], year part).
fn year_of_epoch(epoch: i64) -> i64 {
    let z = epoch.div_euclid(SECONDS_PER_DAY) + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    if month <= 2 {
        y + 1
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1999-01-01T00:00:00Z
    const Y1999: i64 = 915_148_800;

    #[test]
    fn test_bare_year_equals_january_first() {
        assert_eq!(resolve_epoch("1999"), Y1999);
        assert_eq!(resolve_epoch("1999-01-01"), Y1999);
        assert_eq!(resolve_epoch("1999-1-1"), Y1999);
        assert_eq!(resolve_epoch("1999.1.1"), Y1999);
    }

    #[test]
    fn test_missing_components_default_to_one() {
        assert_eq!(resolve_epoch("2004-06"), resolve_epoch("2004-06-01"));
        assert_eq!(resolve_epoch("2004"), resolve_epoch("2004-1-1"));
    }

    #[test]
    fn test_impossible_calendar_day_is_sentinel() {
        assert_eq!(resolve_epoch("2004-02-31"), LONG_TIME_AGO);
        assert_eq!(resolve_epoch("2023-02-29"), LONG_TIME_AGO, "2023 is not a leap year");
        assert_eq!(resolve_epoch("2005-04-31"), LONG_TIME_AGO);
    }

    #[test]
    fn test_leap_day_resolves_in_leap_years() {
        // 2004-02-29T00:00:00Z
        assert_eq!(resolve_epoch("2004-02-29"), 1_078_012_800);
        assert_eq!(resolve_epoch("2000-02-29"), resolve_epoch("2000-2-29"));
    }

    #[test]
    fn test_out_of_range_components_reset_to_one() {
        assert_eq!(resolve_epoch("0"), resolve_epoch("1"));
        assert_eq!(resolve_epoch("10000"), resolve_epoch("1"));
        assert_eq!(resolve_epoch("2004-13-05"), resolve_epoch("2004-01-05"));
        assert_eq!(resolve_epoch("2004-06-32"), resolve_epoch("2004-06-01"));
        assert_eq!(resolve_epoch("2004-0-0"), resolve_epoch("2004-01-01"));
    }

    #[test]
    fn test_oversized_digit_run_is_out_of_range() {
        assert_eq!(resolve_epoch("99999999999999999999"), resolve_epoch("1"));
    }

    #[test]
    fn test_sentinel_precedes_every_resolvable_date() {
        assert!(LONG_TIME_AGO < resolve_epoch("1"), "sentinel must sort before year 1");
        assert!(LONG_TIME_AGO < resolve_epoch("1970"));
        assert!(LONG_TIME_AGO < resolve_epoch("9999-12-31"));
    }

    #[test]
    fn test_undelimited_input_salvages_leading_digits() {
        assert_eq!(resolve_epoch("1999 (remaster)"), Y1999);
        assert_eq!(resolve_epoch("garbage"), LONG_TIME_AGO);
        assert_eq!(resolve_epoch(""), LONG_TIME_AGO);
    }

    #[test]
    fn test_unparseable_component_is_sentinel() {
        assert_eq!(resolve_epoch("2004-xx-01"), LONG_TIME_AGO);
        assert_eq!(resolve_epoch("2004-"), LONG_TIME_AGO);
        assert_eq!(resolve_epoch("19.99-01"), LONG_TIME_AGO);
    }

    #[test]
    fn test_pre_epoch_dates_go_negative() {
        assert_eq!(resolve_epoch("1970"), 0);
        assert_eq!(resolve_epoch("1969"), -31_536_000);
    }

    #[test]
    fn test_display_year_tracks_utc() {
        assert_eq!(epoch_display_year(Y1999), "1999");
        assert_eq!(epoch_display_year(0), "1970");
        assert_eq!(epoch_display_year(resolve_epoch("1969-12-31")), "1969");
        assert_eq!(epoch_display_year(resolve_epoch("2004-02-29")), "2004");
    }

    #[test]
    fn test_display_year_of_sentinel_is_zero() {
        assert_eq!(epoch_display_year(LONG_TIME_AGO), "0");
    }
}
