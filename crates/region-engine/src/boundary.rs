//! Unit boundaries: the first and last instant of the unit containing an
//! instant.
//!
//! Day-sized and larger units start at local midnight of their first day.
//! Hours, minutes and seconds are truncated on the local clock, measured back
//! from the instant so they stay correct inside a DST fold, and never reach
//! back past an offset transition. A transition that is not a whole number
//! of units (Lord Howe's half hour, historical local mean time) therefore
//! splits a unit in two. Ends are one nanosecond before the next unit's
//! start.
//!
//! Boundaries are total: a unit reaching past the representable range is
//! clipped to [`Instant::min_value`] or [`Instant::max_value`].

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::authority::{midnight, shift_days};
use crate::calendar::{CalendarSystem, Era};
use crate::instant::Instant;
use crate::region::Region;
use crate::unit::CalendarUnit;
use crate::zone;

/// A closed range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: Instant,
    pub end: Instant,
}

impl Interval {
    pub fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Length from start to end, inclusive of the final nanosecond.
    pub fn duration(&self) -> chrono::TimeDelta {
        (self.end - self.start) + chrono::TimeDelta::nanoseconds(1)
    }
}

/// First instant of the `unit` containing `instant`.
///
/// # Examples
///
/// ```
/// use region_engine::{boundary, CalendarUnit, Region};
///
/// let rome = Region::new("gregorian", "Europe/Rome", "it_IT").unwrap();
/// let t = "2021-05-20T15:42:10Z".parse().unwrap();
/// let start = boundary::start_of(&rome, t, CalendarUnit::Month);
/// assert_eq!(start.to_string(), "2021-04-30T22:00:00Z");
/// ```
pub fn start_of(region: &Region, instant: Instant, unit: CalendarUnit) -> Instant {
    match unit {
        CalendarUnit::Nanosecond => instant,
        CalendarUnit::Hour | CalendarUnit::Minute | CalendarUnit::Second => {
            let aligned = aligned_clock_start(region, instant, unit);
            zone::transition_between(region.time_zone(), aligned, instant).unwrap_or(aligned)
        }
        CalendarUnit::Era => match local_era(region, instant) {
            Era::BeforeCommon => Instant::min_value(),
            Era::Common => common_era_start(region).unwrap_or_else(Instant::min_value),
        },
        _ => first_day(region, instant, unit)
            .and_then(|date| at_midnight(region.time_zone(), date))
            .unwrap_or_else(Instant::min_value),
    }
}

/// Last instant (to the nanosecond) of the `unit` containing `instant`.
pub fn end_of(region: &Region, instant: Instant, unit: CalendarUnit) -> Instant {
    next_start(region, instant, unit)
        .and_then(|next| next.add_nanos(-1).ok())
        .unwrap_or_else(Instant::max_value)
}

/// Both ends of the `unit` containing `instant`.
pub fn interval_of(region: &Region, instant: Instant, unit: CalendarUnit) -> Interval {
    Interval {
        start: start_of(region, instant, unit),
        end: end_of(region, instant, unit),
    }
}

/// Start of the following unit, `None` past the representable range.
fn next_start(region: &Region, instant: Instant, unit: CalendarUnit) -> Option<Instant> {
    match unit {
        CalendarUnit::Nanosecond => instant.add_nanos(1).ok(),
        CalendarUnit::Hour | CalendarUnit::Minute | CalendarUnit::Second => {
            let start = start_of(region, instant, unit);
            let aligned_next = aligned_clock_start(region, start, unit)
                .add_nanos(unit_nanos(unit))
                .ok()?;
            let switch = zone::transition_between(region.time_zone(), start, aligned_next);
            Some(switch.unwrap_or(aligned_next))
        }
        CalendarUnit::Era => match local_era(region, instant) {
            Era::BeforeCommon => common_era_start(region),
            Era::Common => None,
        },
        _ => next_first_day(region, instant, unit)
            .and_then(|date| at_midnight(region.time_zone(), date)),
    }
}

fn unit_nanos(unit: CalendarUnit) -> i64 {
    match unit {
        CalendarUnit::Hour => 3_600_000_000_000,
        CalendarUnit::Minute => 60_000_000_000,
        _ => 1_000_000_000,
    }
}

/// `instant` minus its local sub-unit fields, clipped at the range start.
fn aligned_clock_start(region: &Region, instant: Instant, unit: CalendarUnit) -> Instant {
    instant
        .add_nanos(-clock_offset_nanos(region, instant, unit))
        .unwrap_or_else(|_| Instant::min_value())
}

/// Nanoseconds elapsed since the local start of the clock unit.
fn clock_offset_nanos(region: &Region, instant: Instant, unit: CalendarUnit) -> i64 {
    let local = zone::local_datetime(region.time_zone(), instant);
    let nanos = i64::from(local.nanosecond());
    let seconds = match unit {
        CalendarUnit::Hour => i64::from(local.minute()) * 60 + i64::from(local.second()),
        CalendarUnit::Minute => i64::from(local.second()),
        _ => 0,
    };
    seconds * 1_000_000_000 + nanos
}

fn local_date(region: &Region, instant: Instant) -> NaiveDate {
    zone::local_datetime(region.time_zone(), instant).date()
}

fn local_era(region: &Region, instant: Instant) -> Era {
    let cal = region.calendar();
    let (year, _, _) = cal.fields(local_date(region, instant));
    cal.era_year(year).0
}

fn common_era_start(region: &Region) -> Option<Instant> {
    let cal = region.calendar();
    let year = cal.proleptic_year(Era::Common, 1);
    at_midnight(region.time_zone(), cal.date(year, 1, 1)?)
}

fn at_midnight(tz: Tz, date: NaiveDate) -> Option<Instant> {
    zone::resolve_local(tz, midnight(date)).ok()
}

/// First local day of the day-or-larger `unit` containing `instant`.
fn first_day(region: &Region, instant: Instant, unit: CalendarUnit) -> Option<NaiveDate> {
    let cal = region.calendar();
    let rule = region.week_rule();
    let date = local_date(region, instant);
    let (year, month, _) = cal.fields(date);
    match unit {
        CalendarUnit::Year => cal.date(year, 1, 1),
        CalendarUnit::Month => cal.date(year, month, 1),
        CalendarUnit::WeekOfMonth | CalendarUnit::WeekOfYear => rule.week_start(date),
        CalendarUnit::YearForWeekOfYear => week_year_start(region, cal, date, 0),
        _ => Some(date),
    }
}

/// First local day of the unit after the one containing `instant`.
fn next_first_day(region: &Region, instant: Instant, unit: CalendarUnit) -> Option<NaiveDate> {
    let cal = region.calendar();
    let rule = region.week_rule();
    let date = local_date(region, instant);
    let (year, month, _) = cal.fields(date);
    match unit {
        CalendarUnit::Year => cal.date(year.checked_add(1)?, 1, 1),
        CalendarUnit::Month => {
            let (y, m) = cal.add_months(year, month, 1)?;
            cal.date(y, m, 1)
        }
        CalendarUnit::WeekOfMonth | CalendarUnit::WeekOfYear => {
            shift_days(rule.week_start(date)?, 7)
        }
        CalendarUnit::YearForWeekOfYear => week_year_start(region, cal, date, 1),
        _ => date.succ_opt(),
    }
}

/// First day of week 1 of the week-based year of `date`, moved by `offset` years.
fn week_year_start(
    region: &Region,
    cal: &dyn CalendarSystem,
    date: NaiveDate,
    offset: i32,
) -> Option<NaiveDate> {
    let rule = region.week_rule();
    let (week_year, _) = rule.week_of_year(cal, date)?;
    rule.date_for_week_of_year(cal, week_year.checked_add(offset)?, 1, rule.first_weekday())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Instant {
        s.parse().unwrap()
    }

    fn region(calendar: &str, tz: &str, locale: &str) -> Region {
        Region::new(calendar, tz, locale).unwrap()
    }

    #[test]
    fn test_day_boundaries_in_zone() {
        let ny = region("gregorian", "America/New_York", "en_US");
        let t = at("2021-06-15T03:00:00Z"); // 23:00 on the 14th locally
        assert_eq!(start_of(&ny, t, CalendarUnit::Day).to_string(), "2021-06-14T04:00:00Z");
        assert_eq!(
            end_of(&ny, t, CalendarUnit::Day).to_string(),
            "2021-06-15T03:59:59.999999999Z"
        );
    }

    #[test]
    fn test_dst_day_is_23_hours() {
        let ny = region("gregorian", "America/New_York", "en_US");
        let t = at("2021-03-14T15:00:00Z");
        let day = interval_of(&ny, t, CalendarUnit::Day);
        assert_eq!(day.duration(), chrono::TimeDelta::hours(23));
        assert!(day.contains(t));
    }

    #[test]
    fn test_week_follows_locale() {
        let t = at("2021-03-10T12:00:00Z"); // Wednesday
        let us = region("gregorian", "UTC", "en_US");
        let de = region("gregorian", "UTC", "de_DE");
        assert_eq!(start_of(&us, t, CalendarUnit::WeekOfYear).to_string(), "2021-03-07T00:00:00Z");
        assert_eq!(start_of(&de, t, CalendarUnit::WeekOfYear).to_string(), "2021-03-08T00:00:00Z");
        assert_eq!(end_of(&de, t, CalendarUnit::WeekOfMonth).to_string(), "2021-03-14T23:59:59.999999999Z");
    }

    #[test]
    fn test_year_and_week_year() {
        let iso = region("iso8601", "UTC", "en_US");
        let t = at("2021-01-02T12:00:00Z"); // ISO week 53 of 2020
        assert_eq!(start_of(&iso, t, CalendarUnit::Year).to_string(), "2021-01-01T00:00:00Z");
        assert_eq!(
            start_of(&iso, t, CalendarUnit::YearForWeekOfYear).to_string(),
            "2019-12-30T00:00:00Z"
        );
        assert_eq!(
            end_of(&iso, t, CalendarUnit::YearForWeekOfYear).to_string(),
            "2021-01-03T23:59:59.999999999Z"
        );
    }

    #[test]
    fn test_hour_truncation_in_fold() {
        let ny = region("gregorian", "America/New_York", "en_US");
        let second_pass = at("2021-11-07T06:45:00Z"); // 01:45 EST
        assert_eq!(start_of(&ny, second_pass, CalendarUnit::Hour).to_string(), "2021-11-07T06:00:00Z");
        assert_eq!(
            end_of(&ny, second_pass, CalendarUnit::Minute).to_string(),
            "2021-11-07T06:45:59.999999999Z"
        );
    }

    #[test]
    fn test_hours_split_at_half_hour_transition() {
        // Lord Howe falls back from +11:00 to +10:30 at 15:00Z
        let lord_howe = region("gregorian", "Australia/Lord_Howe", "en_AU");
        let before = interval_of(&lord_howe, at("2021-04-03T14:50:00Z"), CalendarUnit::Hour);
        assert_eq!(before.start.to_string(), "2021-04-03T14:00:00Z");
        assert_eq!(before.end.to_string(), "2021-04-03T14:59:59.999999999Z");

        let next = before.end.add_nanos(1).unwrap();
        let after = interval_of(&lord_howe, next, CalendarUnit::Hour);
        assert_eq!(after.start, next);
        assert_eq!(after.end.to_string(), "2021-04-03T15:29:59.999999999Z"); // 01:30 to 02:00 local

        let following = interval_of(&lord_howe, after.end.add_nanos(1).unwrap(), CalendarUnit::Hour);
        assert_eq!(following.duration(), chrono::TimeDelta::hours(1));
        assert_eq!(start_of(&lord_howe, at("2021-04-03T15:10:00Z"), CalendarUnit::Hour), next);
    }

    #[test]
    fn test_month_end_in_leap_year() {
        let utc = Region::utc();
        let t = at("2024-02-10T00:00:00Z");
        assert_eq!(end_of(&utc, t, CalendarUnit::Month).to_string(), "2024-02-29T23:59:59.999999999Z");
    }

    #[test]
    fn test_era_bounds() {
        let utc = Region::utc();
        let t = at("2021-01-01T00:00:00Z");
        assert_eq!(start_of(&utc, t, CalendarUnit::Era).to_string(), "0001-01-01T00:00:00Z");
        assert_eq!(end_of(&utc, t, CalendarUnit::Era), Instant::max_value());
    }

    #[test]
    fn test_end_plus_one_is_next_start() {
        let rome = region("gregorian", "Europe/Rome", "it_IT");
        let t = at("2021-10-31T00:30:00Z");
        for unit in CalendarUnit::ALL {
            let end = end_of(&rome, t, unit);
            if end == Instant::max_value() {
                continue;
            }
            let next = end.add_nanos(1).unwrap();
            assert_eq!(start_of(&rome, next, unit), next, "unit {unit}");
            assert!(start_of(&rome, t, unit) <= t && t <= end, "unit {unit}");
        }
    }

    #[test]
    fn test_range_edges_are_clipped() {
        let utc = Region::utc();
        assert_eq!(start_of(&utc, Instant::min_value(), CalendarUnit::Era), Instant::min_value());
        assert_eq!(end_of(&utc, Instant::max_value(), CalendarUnit::Year), Instant::max_value());
    }
}
