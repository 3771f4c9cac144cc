//! Comparisons at unit granularity and relative queries.
//!
//! Unit comparisons go through [`boundary::start_of`]: two instants are "in
//! the same month" when their months start at the same instant, which also
//! requires the same year and era. Relative queries take the reference
//! instant `now` explicitly.

use std::cmp::Ordering;

use chrono::{Datelike, TimeDelta};

use crate::authority;
use crate::boundary;
use crate::delta::ComponentDelta;
use crate::instant::Instant;
use crate::region::Region;
use crate::unit::CalendarUnit;
use crate::zone;

/// Order `a` and `b` by the `unit` containing them.
pub fn compare(region: &Region, a: Instant, b: Instant, unit: CalendarUnit) -> Ordering {
    boundary::start_of(region, a, unit).cmp(&boundary::start_of(region, b, unit))
}

/// Whether `a` and `b` fall in the same `unit` (and every coarser unit).
///
/// # Examples
///
/// ```
/// use region_engine::{predicate, CalendarUnit, Region};
///
/// let tokyo = Region::new("gregorian", "Asia/Tokyo", "ja_JP").unwrap();
/// let a = "2021-05-31T14:00:00Z".parse().unwrap(); // June 1st in Tokyo
/// let b = "2021-06-01T10:00:00Z".parse().unwrap();
/// assert!(predicate::is_in_same(&tokyo, a, b, CalendarUnit::Day));
/// assert!(!predicate::is_in_same(&Region::utc(), a, b, CalendarUnit::Day));
/// ```
pub fn is_in_same(region: &Region, a: Instant, b: Instant, unit: CalendarUnit) -> bool {
    compare(region, a, b, unit) == Ordering::Equal
}

/// Whether the `unit` of `a` comes before the `unit` of `b`.
pub fn is_before(region: &Region, a: Instant, b: Instant, unit: CalendarUnit) -> bool {
    compare(region, a, b, unit) == Ordering::Less
}

/// Whether the `unit` of `a` comes after the `unit` of `b`.
pub fn is_after(region: &Region, a: Instant, b: Instant, unit: CalendarUnit) -> bool {
    compare(region, a, b, unit) == Ordering::Greater
}

pub fn is_in_today(region: &Region, instant: Instant, now: Instant) -> bool {
    is_in_same(region, instant, now, CalendarUnit::Day)
}

pub fn is_in_yesterday(region: &Region, instant: Instant, now: Instant) -> bool {
    is_in_day_from(region, instant, now, -1)
}

pub fn is_in_tomorrow(region: &Region, instant: Instant, now: Instant) -> bool {
    is_in_day_from(region, instant, now, 1)
}

fn is_in_day_from(region: &Region, instant: Instant, now: Instant, days: i64) -> bool {
    authority::add(region, now, &ComponentDelta::days(days))
        .map(|anchor| is_in_same(region, instant, anchor, CalendarUnit::Day))
        .unwrap_or(false)
}

/// Whether the local weekday of `instant` is a weekend day of the region's locale.
pub fn is_in_weekend(region: &Region, instant: Instant) -> bool {
    let weekday = zone::local_datetime(region.time_zone(), instant).weekday();
    region.weekend().contains(&weekday)
}

pub fn is_leap_year(region: &Region, instant: Instant) -> bool {
    authority::to_civil(region, instant).is_leap_year
}

pub fn is_leap_month(region: &Region, instant: Instant) -> bool {
    authority::to_civil(region, instant).is_leap_month
}

/// Whether `instant` lies between `start` and `end`.
pub fn is_in_range(instant: Instant, start: Instant, end: Instant, inclusive: bool) -> bool {
    if inclusive {
        start <= instant && instant <= end
    } else {
        start < instant && instant < end
    }
}

/// Whether `a` and `b` are at most `precision` apart.
pub fn is_close_to(a: Instant, b: Instant, precision: TimeDelta) -> bool {
    (a - b).abs() <= precision.abs()
}

pub fn is_in_past(instant: Instant, now: Instant) -> bool {
    instant < now
}

pub fn is_in_future(instant: Instant, now: Instant) -> bool {
    instant > now
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Instant {
        s.parse().unwrap()
    }

    #[test]
    fn test_same_month_needs_same_year() {
        let utc = Region::utc();
        let a = at("2021-05-10T00:00:00Z");
        assert!(is_in_same(&utc, a, at("2021-05-31T23:59:59Z"), CalendarUnit::Month));
        assert!(!is_in_same(&utc, a, at("2022-05-10T00:00:00Z"), CalendarUnit::Month));
    }

    #[test]
    fn test_before_and_after_at_granularity() {
        let utc = Region::utc();
        let a = at("2021-05-10T08:00:00Z");
        let b = at("2021-05-10T20:00:00Z");
        assert!(!is_before(&utc, a, b, CalendarUnit::Day));
        assert!(is_before(&utc, a, b, CalendarUnit::Hour));
        assert!(is_after(&utc, b, a, CalendarUnit::Minute));
        assert_eq!(compare(&utc, a, b, CalendarUnit::Year), Ordering::Equal);
    }

    #[test]
    fn test_relative_days() {
        let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
        let now = at("2021-06-15T02:00:00Z"); // 22:00 on the 14th locally
        assert!(is_in_today(&ny, at("2021-06-14T12:00:00Z"), now));
        assert!(is_in_tomorrow(&ny, at("2021-06-15T12:00:00Z"), now));
        assert!(is_in_yesterday(&ny, at("2021-06-13T12:00:00Z"), now));
        assert!(!is_in_today(&Region::utc(), at("2021-06-14T12:00:00Z"), now));
    }

    #[test]
    fn test_weekend_by_locale() {
        let friday = at("2021-06-18T12:00:00Z");
        let saturday = at("2021-06-19T12:00:00Z");
        let us = Region::new("gregorian", "UTC", "en_US").unwrap();
        let ae = Region::new("gregorian", "UTC", "ar_AE").unwrap();
        assert!(!is_in_weekend(&us, friday));
        assert!(is_in_weekend(&us, saturday));
        assert!(is_in_weekend(&ae, friday));
    }

    #[test]
    fn test_leap_queries() {
        let utc = Region::utc();
        assert!(is_leap_year(&utc, at("2000-06-01T00:00:00Z")));
        assert!(!is_leap_year(&utc, at("1900-06-01T00:00:00Z")));
        assert!(is_leap_year(&utc, at("2024-06-01T00:00:00Z")));
        assert!(!is_leap_month(&utc, at("2024-02-01T00:00:00Z")));
    }

    #[test]
    fn test_range_and_closeness() {
        let a = at("2021-01-01T00:00:00Z");
        let b = at("2021-01-02T00:00:00Z");
        assert!(is_in_range(a, a, b, true));
        assert!(!is_in_range(a, a, b, false));
        assert!(is_close_to(a, b, TimeDelta::days(1)));
        assert!(!is_close_to(a, b, TimeDelta::hours(23)));
        assert!(is_in_past(a, b));
        assert!(is_in_future(b, a));
    }
}
