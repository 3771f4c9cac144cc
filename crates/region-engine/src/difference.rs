//! Differences between two zoned instants, counted in calendar units.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::authority;
use crate::calendar::CalendarSystem;
use crate::delta::{ComponentDelta, DeltaUnit};
use crate::error::{EngineError, Result};
use crate::instant::Instant;
use crate::unit::CalendarUnit;
use crate::zone;
use crate::zoned::RegionDateTime;

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Whole units between `from` and `to`, computed independently per unit.
///
/// Each requested unit gets the full count on its own: the difference
/// between 2021-01-01 and 2022-03-01 in `[year, month]` is `1y14mo`. Week
/// units land in `weeks`, `weekday` in `days`, `yearForWeekOfYear` in
/// `years`. The sign follows `to - from`.
///
/// Days and weeks compare wall clocks: both instants are read in `from`'s
/// region, and a day counts once the wall clock has advanced by a full day.
/// These counts are exactly antisymmetric, even across DST changes. Years
/// and months count how many can be added to `from` without passing `to`.
/// Clock units are elapsed time truncated toward zero.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFieldCombination`] when `era` is
/// requested, or [`EngineError::OutOfRange`] when a count does not fit.
///
/// # Examples
///
/// ```
/// use region_engine::{difference, CalendarUnit, Region, RegionDateTime};
///
/// let utc = Region::utc();
/// let from = RegionDateTime::new("2021-01-31T00:00:00Z".parse().unwrap(), Some(&utc));
/// let to = RegionDateTime::new("2021-03-01T12:00:00Z".parse().unwrap(), Some(&utc));
/// let d = difference::difference(&from, &to, &[CalendarUnit::Month, CalendarUnit::Day]).unwrap();
/// assert_eq!((d.months, d.days), (1, 29));
/// ```
pub fn difference(
    from: &RegionDateTime,
    to: &RegionDateTime,
    units: &[CalendarUnit],
) -> Result<ComponentDelta> {
    let (from_wall, to_wall) = walls(from, to);
    let cal = from.region().calendar();
    let tz = from.region().time_zone();
    let mut result = ComponentDelta::new();
    for unit in units {
        let delta_unit = delta_unit_of(*unit)?;
        let n = match delta_unit {
            DeltaUnit::Year | DeltaUnit::Month => {
                let dir = if to.instant() >= from.instant() { 1 } else { -1 };
                let landing = |wall| {
                    zone::resolve_local(tz, wall)
                        .ok()
                        .map(|landed| landed.cmp(&to.instant()))
                };
                let base = ComponentDelta::new();
                calendar_count(cal, from_wall, &base, delta_unit, to_wall, dir, landing)
            }
            _ => match delta_unit.nanos() {
                Some(len) => elapsed(from.instant(), to.instant(), len)?,
                None => wall_count(cal, from_wall, &ComponentDelta::new(), delta_unit, to_wall)?,
            },
        };
        result.set(delta_unit, n);
    }
    Ok(result)
}

/// Greedy breakdown: the largest requested unit first, the remainder
/// carried to the smaller ones.
///
/// Every unit, clock units included, is counted on `from`'s wall clock, the
/// way [`authority::add`] applies deltas. Adding the result to `from` lands
/// on `to` when the smallest unit divides the remainder, except that a
/// repeated wall time resolves to its first occurrence.
///
/// # Errors
///
/// Same as [`difference`].
pub fn breakdown(
    from: &RegionDateTime,
    to: &RegionDateTime,
    units: &[CalendarUnit],
) -> Result<ComponentDelta> {
    let mut delta_units = units
        .iter()
        .map(|u| delta_unit_of(*u))
        .collect::<Result<Vec<_>>>()?;
    delta_units.sort();
    delta_units.dedup();

    let (from_wall, to_wall) = walls(from, to);
    let cal = from.region().calendar();
    let mut acc = ComponentDelta::new();
    for unit in delta_units {
        let n = wall_count(cal, from_wall, &acc, unit, to_wall)?;
        acc.set(unit, n);
    }
    Ok(acc)
}

fn delta_unit_of(unit: CalendarUnit) -> Result<DeltaUnit> {
    unit.delta_unit().ok_or_else(|| {
        EngineError::InvalidFieldCombination(format!("cannot count differences in {unit}"))
    })
}

/// Both instants on `from`'s wall clock.
fn walls(from: &RegionDateTime, to: &RegionDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let tz = from.region().time_zone();
    (
        zone::local_datetime(tz, from.instant()),
        zone::local_datetime(tz, to.instant()),
    )
}

/// Whole `len`-nanosecond spans of elapsed time from `from` to `to`.
fn elapsed(from: Instant, to: Instant, len: i64) -> Result<i64> {
    let n = (to.unix_nanos() - from.unix_nanos()) / i128::from(len);
    i64::try_from(n).map_err(|_| overflow())
}

/// Largest count `n` of `unit` such that the wall clock `from + base + n unit`
/// does not pass `to`.
fn wall_count(
    cal: &dyn CalendarSystem,
    from: NaiveDateTime,
    base: &ComponentDelta,
    unit: DeltaUnit,
    to: NaiveDateTime,
) -> Result<i64> {
    let cursor = authority::shift_local(cal, from, base).ok_or_else(overflow)?;
    let fixed_len = match unit {
        DeltaUnit::Week => Some(7 * NANOS_PER_DAY),
        DeltaUnit::Day => Some(NANOS_PER_DAY),
        _ => unit.nanos().map(i128::from),
    };
    match fixed_len {
        Some(len) => i64::try_from(wall_nanos(cursor, to) / len).map_err(|_| overflow()),
        None => {
            let dir = if to >= cursor { 1 } else { -1 };
            Ok(calendar_count(cal, from, base, unit, to, dir, |wall| Some(wall.cmp(&to))))
        }
    }
}

/// Largest count `n` of a year or month `unit` such that `from + base + n unit`,
/// placed by `landing`, is not past the target in direction `dir`.
///
/// `landing` orders a shifted wall clock against the target, `None` when it
/// cannot be placed.
fn calendar_count(
    cal: &dyn CalendarSystem,
    from: NaiveDateTime,
    base: &ComponentDelta,
    unit: DeltaUnit,
    to: NaiveDateTime,
    dir: i64,
    landing: impl Fn(NaiveDateTime) -> Option<Ordering>,
) -> i64 {
    let fits = |n: i64| -> bool {
        base.get(unit)
            .checked_add(n)
            .and_then(|total| authority::shift_local(cal, from, &base.with(unit, total)))
            .and_then(&landing)
            .is_some_and(|o| {
                if dir > 0 {
                    o != Ordering::Greater
                } else {
                    o != Ordering::Less
                }
            })
    };
    let start = authority::shift_local(cal, from, base).unwrap_or(from);
    let guess = estimate(cal, start, to, unit).saturating_mul(dir).max(0);
    dir * largest_fitting(guess, |k| fits(dir * k))
}

/// Signed nanoseconds from `from` to `to` on a wall clock.
fn wall_nanos(from: NaiveDateTime, to: NaiveDateTime) -> i128 {
    let span = to.signed_duration_since(from);
    i128::from(span.num_seconds()) * 1_000_000_000 + i128::from(span.subsec_nanos())
}

/// Year or month count between the two wall-clock dates, ignoring the rest.
fn estimate(cal: &dyn CalendarSystem, from: NaiveDateTime, to: NaiveDateTime, unit: DeltaUnit) -> i64 {
    let (fy, fm, _) = cal.fields(from.date());
    let (ty, tm, _) = cal.fields(to.date());
    let years = i64::from(ty) - i64::from(fy);
    match unit {
        DeltaUnit::Year => years,
        _ => years * 12 + i64::from(tm) - i64::from(fm),
    }
}

/// Largest `k >= 0` with `fits(k)`, starting the search at `guess`.
///
/// `fits` must hold at zero and be monotone (true up to some `k`, false
/// after it).
fn largest_fitting(guess: i64, fits: impl Fn(i64) -> bool) -> i64 {
    let mut lo;
    let mut hi;
    let mut step = 1i64;
    if fits(guess) {
        lo = guess;
        loop {
            match lo.checked_add(step) {
                Some(next) if fits(next) => lo = next,
                Some(next) => {
                    hi = next;
                    break;
                }
                None => {
                    hi = i64::MAX;
                    break;
                }
            }
            step = step.saturating_mul(2);
        }
    } else {
        hi = guess;
        loop {
            let next = hi.saturating_sub(step).max(0);
            if next == 0 || fits(next) {
                lo = next;
                break;
            }
            hi = next;
            step = step.saturating_mul(2);
        }
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

fn overflow() -> EngineError {
    EngineError::OutOfRange("difference does not fit in the delta".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn zoned(s: &str, region: &Region) -> RegionDateTime {
        RegionDateTime::new(s.parse().unwrap(), Some(region))
    }

    #[test]
    fn test_units_are_independent() {
        let utc = Region::utc();
        let from = zoned("2021-01-01T00:00:00Z", &utc);
        let to = zoned("2022-03-01T00:00:00Z", &utc);
        let d = difference(&from, &to, &[CalendarUnit::Year, CalendarUnit::Month]).unwrap();
        assert_eq!((d.years, d.months), (1, 14));
    }

    #[test]
    fn test_day_symmetry() {
        let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
        let a = zoned("2021-03-01T15:00:00Z", &ny);
        let b = zoned("2021-04-11T14:00:00Z", &ny);
        let forward = difference(&a, &b, &[CalendarUnit::Day]).unwrap();
        let backward = difference(&b, &a, &[CalendarUnit::Day]).unwrap();
        assert_eq!(forward.days, 41);
        assert_eq!(backward.days, -41);
    }

    #[test]
    fn test_partial_unit_is_not_counted() {
        let utc = Region::utc();
        let from = zoned("2021-01-15T12:00:00Z", &utc);
        let to = zoned("2021-02-15T11:59:59Z", &utc);
        let d = difference(&from, &to, &[CalendarUnit::Month, CalendarUnit::Hour]).unwrap();
        assert_eq!(d.months, 0);
        assert_eq!(d.hours, 31 * 24 - 1);
    }

    #[test]
    fn test_day_across_dst_is_calendar_day() {
        let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
        let from = zoned("2021-03-13T17:00:00Z", &ny); // 12:00 EST
        let to = zoned("2021-03-14T16:00:00Z", &ny); // 12:00 EDT, 23 hours later
        let d = difference(&from, &to, &[CalendarUnit::Day, CalendarUnit::Hour]).unwrap();
        assert_eq!(d.days, 1);
        assert_eq!(d.hours, 23);
    }

    #[test]
    fn test_day_difference_is_antisymmetric_across_dst() {
        let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
        let a = zoned("2021-03-13T07:30:00Z", &ny); // 02:30 EST
        let b = zoned("2021-03-14T07:10:00Z", &ny); // 03:10 EDT
        let forward = difference(&a, &b, &[CalendarUnit::Day, CalendarUnit::WeekOfYear]).unwrap();
        let backward = difference(&b, &a, &[CalendarUnit::Day, CalendarUnit::WeekOfYear]).unwrap();
        assert_eq!(forward.days, 1);
        assert_eq!(backward.days, -1);
        assert_eq!((forward.weeks, backward.weeks), (0, 0));
    }

    #[test]
    fn test_breakdown_lands_on_target_across_dst() {
        let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
        let from = zoned("2021-03-13T07:30:00Z", &ny);
        let to = zoned("2021-03-14T07:10:00Z", &ny);
        let d = breakdown(&from, &to, &[CalendarUnit::Day, CalendarUnit::Minute]).unwrap();
        assert_eq!((d.days, d.minutes), (1, 40));
        assert_eq!(authority::add(&ny, from.instant(), &d).unwrap(), to.instant());
    }

    #[test]
    fn test_large_month_counts() {
        let utc = Region::utc();
        let from = zoned("1900-01-31T00:00:00Z", &utc);
        let to = zoned("2100-02-28T00:00:00Z", &utc);
        let d = difference(&from, &to, &[CalendarUnit::Month, CalendarUnit::Year]).unwrap();
        assert_eq!((d.years, d.months), (200, 2401));
        let back = difference(&to, &from, &[CalendarUnit::Month]).unwrap();
        assert_eq!(back.months, -2400);
    }

    #[test]
    fn test_mixed_regions() {
        let tokyo = Region::new("gregorian", "Asia/Tokyo", "ja_JP").unwrap();
        let utc = Region::utc();
        let from = zoned("2021-06-01T00:00:00Z", &tokyo); // 09:00 in Tokyo
        let to = zoned("2021-06-03T08:00:00Z", &utc);
        let d = difference(&from, &to, &[CalendarUnit::Day]).unwrap();
        assert_eq!(d.days, 2);
    }

    #[test]
    fn test_era_is_rejected() {
        let utc = Region::utc();
        let a = zoned("2021-01-01T00:00:00Z", &utc);
        let err = difference(&a, &a, &[CalendarUnit::Era]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFieldCombination(_)));
    }

    #[test]
    fn test_weeks_and_weekday() {
        let utc = Region::utc();
        let from = zoned("2021-03-01T00:00:00Z", &utc);
        let to = zoned("2021-03-20T00:00:00Z", &utc);
        let d = difference(&from, &to, &[CalendarUnit::WeekOfYear, CalendarUnit::Weekday]).unwrap();
        assert_eq!((d.weeks, d.days), (2, 19));
    }

    #[test]
    fn test_breakdown_is_greedy() {
        let utc = Region::utc();
        let from = zoned("2021-01-31T00:00:00Z", &utc);
        let to = zoned("2021-03-30T06:30:00Z", &utc);
        let units = [
            CalendarUnit::Day,
            CalendarUnit::Month,
            CalendarUnit::Hour,
            CalendarUnit::Minute,
        ];
        let d = breakdown(&from, &to, &units).unwrap();
        assert_eq!((d.months, d.days, d.hours, d.minutes), (1, 30, 6, 30));
        let back = authority::add(&utc, from.instant(), &d).unwrap();
        assert_eq!(back, to.instant());
    }

    #[test]
    fn test_breakdown_negative() {
        let utc = Region::utc();
        let from = zoned("2021-03-10T00:00:00Z", &utc);
        let to = zoned("2021-01-05T12:00:00Z", &utc);
        let d = breakdown(&from, &to, &[CalendarUnit::Month, CalendarUnit::Day, CalendarUnit::Hour]).unwrap();
        assert_eq!((d.months, d.days, d.hours), (-2, -4, -12));
    }
}
