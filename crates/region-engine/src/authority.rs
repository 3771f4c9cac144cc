//! The calendar authority: conversions between instants and civil fields,
//! canonical construction from field overrides, and calendar arithmetic.
//!
//! Every function here is a pure function of its arguments. Wall-clock
//! values that fall into a DST fold or gap are resolved by
//! [`crate::zone::resolve_local`].

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::calendar::{CalendarSystem, Era};
use crate::civil::{CivilDateTime, FieldOverrides};
use crate::delta::{ComponentDelta, DeltaUnit};
use crate::error::{EngineError, Result};
use crate::instant::Instant;
use crate::region::Region;
use crate::zone;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

// ── Conversion ──────────────────────────────────────────────────────────────

/// Decompose `instant` into the calendar fields of `region`.
///
/// Applies the timezone offset in force at `instant` (DST included), then
/// splits the wall-clock value per the region's calendar and week rule.
///
/// # Examples
///
/// ```
/// use region_engine::{authority, Instant, Region};
///
/// let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
/// let t: Instant = "2021-07-04T16:30:00Z".parse().unwrap();
/// let civil = authority::to_civil(&ny, t);
/// assert_eq!((civil.month, civil.day, civil.hour), (7, 4, 12));
/// assert!(civil.is_dst);
/// ```
pub fn to_civil(region: &Region, instant: Instant) -> CivilDateTime {
    let tz = region.time_zone();
    let cal = region.calendar();
    let rule = region.week_rule();

    let local = zone::local_datetime(tz, instant);
    let date = local.date();
    let time = local.time();
    let (year, month, day) = cal.fields(date);
    let (era, year_of_era) = cal.era_year(year);
    let (year_for_week_of_year, week_of_year) = rule.week_of_year(cal, date).unwrap_or((year, 1));
    let day_of_year = cal
        .date(year, 1, 1)
        .map(|first| date.signed_duration_since(first).num_days() as u32 + 1)
        .unwrap_or_else(|| date.ordinal());
    let months = cal.months_in_year(year);

    CivilDateTime {
        era,
        year: year_of_era,
        month,
        day,
        hour: time.hour(),
        minute: time.minute(),
        second: time.second(),
        nanosecond: time.nanosecond(),
        weekday: date.weekday(),
        weekday_ordinal: (day - 1) / 7 + 1,
        week_of_month: rule.week_of_month(cal, date).unwrap_or(0),
        week_of_year,
        year_for_week_of_year,
        day_of_year,
        quarter: (month - 1) * 4 / months + 1,
        utc_offset_seconds: zone::offset_seconds(tz, instant),
        is_dst: zone::is_dst(tz, instant),
        is_leap_year: cal.is_leap_year(year),
        is_leap_month: cal.is_leap_month(year, month),
        days_in_month: cal.days_in_month(year, month),
    }
}

/// Resolve civil fields back to an instant.
///
/// Only the era, year, month, day and time-of-day fields are read; the
/// derived fields are ignored. Fold and gap values follow the zone policy.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFieldCombination`] if the fields do not name
/// a real date and time, or [`EngineError::OutOfRange`] when the result is
/// not representable.
pub fn to_instant(region: &Region, civil: &CivilDateTime) -> Result<Instant> {
    let cal = region.calendar();
    let year = proleptic(cal, civil.era, civil.year)?;
    let date = calendar_date(cal, year, civil.month, civil.day)?;
    let time = time_of_day(civil.hour, civil.minute, civil.second, civil.nanosecond)?;
    zone::resolve_local(region.time_zone(), date.and_time(time))
}

// ── Canonical construction ──────────────────────────────────────────────────

/// Build an instant from field overrides, optionally on top of `base`.
///
/// Precedence, most specific first:
///
/// 1. `week_of_year` / `year_for_week_of_year`: the `weekday` (override,
///    else base, else the first weekday) of that week. The week-based year
///    is the override, else the explicit `year`, else the base's.
/// 2. `week_of_month`: the `weekday` of that week of the year and month.
/// 3. `year` / `month` / `day`, each from the override, else the base, else
///    `1` for month and day. A `weekday` with an explicit `day` must agree;
///    without one it moves the date within its week.
///
/// Time-of-day fields come from the override, else the base, else zero.
/// `year` is a year of `era` (default: the base's, else the common era);
/// `year_for_week_of_year` is proleptic.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFieldCombination`] when a field is out of
/// range, fields contradict each other, or no year is available.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use region_engine::{authority, FieldOverrides, Region};
///
/// let region = Region::new("iso8601", "UTC", "en_GB").unwrap();
/// let fields = FieldOverrides::new()
///     .year_for_week_of_year(2021)
///     .week_of_year(10)
///     .weekday(Weekday::Wed);
/// let t = authority::build(&region, None, &fields).unwrap();
/// assert_eq!(t.to_string(), "2021-03-10T00:00:00Z");
/// ```
pub fn build(region: &Region, base: Option<Instant>, fields: &FieldOverrides) -> Result<Instant> {
    let cal = region.calendar();
    let rule = region.week_rule();
    let base = base.map(|b| to_civil(region, b));

    let era = fields.era.or(base.map(|b| b.era)).unwrap_or(Era::Common);
    let explicit_year = fields
        .year
        .map(|y| proleptic(cal, era, y))
        .transpose()?;
    let year = match (explicit_year, base) {
        (Some(y), _) => Some(y),
        (None, Some(b)) => Some(proleptic(cal, era, b.year)?),
        (None, None) => None,
    };
    let weekday = fields.weekday.or(base.map(|b| b.weekday));

    let date = if fields.week_of_year.is_some() || fields.year_for_week_of_year.is_some() {
        let week_year = fields
            .year_for_week_of_year
            .or(explicit_year)
            .or(base.map(|b| b.year_for_week_of_year))
            .ok_or_else(missing_year)?;
        let week = fields
            .week_of_year
            .or(base.map(|b| b.week_of_year))
            .unwrap_or(1);
        let date = rule.date_for_week_of_year(
            cal,
            week_year,
            week,
            weekday.unwrap_or(rule.first_weekday()),
        )?;
        let (y, m, d) = cal.fields(date);
        if fields.year_for_week_of_year.is_some() {
            if let Some(expected) = explicit_year {
                check_agrees("year", expected, y)?;
            }
        }
        if let Some(month) = fields.month {
            check_agrees("month", month, m)?;
        }
        if let Some(day) = fields.day {
            check_agrees("day", day, d)?;
        }
        date
    } else if let Some(week) = fields.week_of_month {
        let year = year.ok_or_else(missing_year)?;
        let month = fields.month.or(base.map(|b| b.month)).unwrap_or(1);
        let date = rule.date_for_week_of_month(
            cal,
            year,
            month,
            week,
            weekday.unwrap_or(rule.first_weekday()),
        )?;
        if let Some(day) = fields.day {
            check_agrees("day", day, cal.fields(date).2)?;
        }
        date
    } else {
        let year = year.ok_or_else(missing_year)?;
        let month = fields.month.or(base.map(|b| b.month)).unwrap_or(1);
        let day = fields.day.or(base.map(|b| b.day)).unwrap_or(1);
        let date = calendar_date(cal, year, month, day)?;
        match fields.weekday {
            Some(wd) if fields.day.is_some() => {
                if date.weekday() != wd {
                    return Err(EngineError::InvalidFieldCombination(format!(
                        "{date} is a {}, not a {wd}",
                        date.weekday()
                    )));
                }
                date
            }
            Some(wd) => {
                let start = rule.week_start(date).ok_or_else(|| out_of_range(date))?;
                shift_days(start, i64::from(rule.days_from_week_start(wd)))
                    .ok_or_else(|| out_of_range(date))?
            }
            None => date,
        }
    };

    let time = time_of_day(
        fields.hour.or(base.map(|b| b.hour)).unwrap_or(0),
        fields.minute.or(base.map(|b| b.minute)).unwrap_or(0),
        fields.second.or(base.map(|b| b.second)).unwrap_or(0),
        fields.nanosecond.or(base.map(|b| b.nanosecond)).unwrap_or(0),
    )?;

    zone::resolve_local(region.time_zone(), date.and_time(time))
}

// ── Arithmetic ──────────────────────────────────────────────────────────────

/// Add a component delta to `instant` in `region`.
///
/// The delta is applied to the wall clock, largest unit first: years and
/// months move the month together, clamping the day to the target month's
/// length; weeks, days, hours, minutes, seconds and nanoseconds then spill
/// normally. The shifted wall-clock value is resolved once, per the
/// fold/gap policy, so `+1h` across a DST change moves the wall clock by one
/// hour rather than the timeline.
///
/// A zero delta returns `instant` unchanged, even inside a fold.
///
/// # Errors
///
/// Returns [`EngineError::OutOfRange`] when the result is not representable.
///
/// # Examples
///
/// ```
/// use region_engine::{authority, ComponentDelta, Region};
///
/// let region = Region::utc();
/// let jan31 = "2021-01-31T10:00:00Z".parse().unwrap();
/// let t = authority::add(&region, jan31, &ComponentDelta::months(1)).unwrap();
/// assert_eq!(t.to_string(), "2021-02-28T10:00:00Z");
/// ```
pub fn add(region: &Region, instant: Instant, delta: &ComponentDelta) -> Result<Instant> {
    if delta.is_zero() {
        return Ok(instant);
    }
    let tz = region.time_zone();
    let local = zone::local_datetime(tz, instant);
    let shifted = shift_local(region.calendar(), local, delta)
        .ok_or_else(|| EngineError::OutOfRange(format!("{instant} {delta} overflows")))?;
    zone::resolve_local(tz, shifted)
}

/// Add the negation of `delta`.
pub fn subtract(region: &Region, instant: Instant, delta: &ComponentDelta) -> Result<Instant> {
    add(region, instant, &-*delta)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Apply `delta` to a wall-clock value without resolving it in a zone.
///
/// `None` when any step leaves the calendar's range.
pub(crate) fn shift_local(
    cal: &dyn CalendarSystem,
    local: NaiveDateTime,
    delta: &ComponentDelta,
) -> Option<NaiveDateTime> {
    let (year, month, day) = cal.fields(local.date());
    let target_year = year.checked_add(i32::try_from(delta.years).ok()?)?;
    let (target_year, target_month) = cal.add_months(
        target_year,
        month.min(cal.months_in_year(target_year)),
        delta.months,
    )?;
    let clamped_day = day.min(cal.days_in_month(target_year, target_month));
    let date = cal.date(target_year, target_month, clamped_day)?;

    let days = delta.weeks.checked_mul(7)?.checked_add(delta.days)?;
    let date = shift_days(date, days)?;
    date.and_time(local.time())
        .checked_add_signed(clock_delta(delta)?)
}

/// The hour, minute, second and nanosecond components as one duration.
fn clock_delta(delta: &ComponentDelta) -> Option<TimeDelta> {
    let nanos: i128 = [
        DeltaUnit::Hour,
        DeltaUnit::Minute,
        DeltaUnit::Second,
        DeltaUnit::Nanosecond,
    ]
    .iter()
    .filter_map(|u| u.nanos().map(|n| i128::from(delta.get(*u)) * i128::from(n)))
    .sum();
    let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as i64;
    TimeDelta::try_seconds(seconds)?.checked_add(&TimeDelta::nanoseconds(subsec))
}

/// Move `date` by `days` days, `None` on overflow.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Validated calendar date: invalid fields are a field error, unrepresentable
/// ones are out of range.
pub(crate) fn calendar_date(
    cal: &dyn CalendarSystem,
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate> {
    if month == 0 || month > cal.months_in_year(year) {
        return Err(EngineError::InvalidFieldCombination(format!(
            "month {month} does not exist in year {year}"
        )));
    }
    let days = cal.days_in_month(year, month);
    if day == 0 || day > days {
        return Err(EngineError::InvalidFieldCombination(format!(
            "day {day} does not exist in {year}-{month:02} ({days} days)"
        )));
    }
    cal.date(year, month, day)
        .ok_or_else(|| EngineError::OutOfRange(format!("year {year}")))
}

/// Local midnight of `date`.
pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn proleptic(cal: &dyn CalendarSystem, era: Era, year_of_era: i32) -> Result<i32> {
    if year_of_era < 1 {
        return Err(EngineError::InvalidFieldCombination(format!(
            "year of era must be positive, got {year_of_era}"
        )));
    }
    Ok(cal.proleptic_year(era, year_of_era))
}

fn time_of_day(hour: u32, minute: u32, second: u32, nanosecond: u32) -> Result<NaiveTime> {
    if hour > 23 || minute > 59 || second > 59 || nanosecond > 999_999_999 {
        return Err(EngineError::InvalidFieldCombination(format!(
            "invalid time of day {hour:02}:{minute:02}:{second:02}.{nanosecond:09}"
        )));
    }
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond).ok_or_else(|| {
        EngineError::InvalidFieldCombination(format!("invalid time of day {hour}:{minute}:{second}"))
    })
}

fn check_agrees<T: PartialEq + std::fmt::Display>(field: &str, given: T, actual: T) -> Result<()> {
    if given == actual {
        Ok(())
    } else {
        Err(EngineError::InvalidFieldCombination(format!(
            "{field} {given} contradicts the week fields, which give {actual}"
        )))
    }
}

fn missing_year() -> EngineError {
    EngineError::InvalidFieldCombination("a year is required without a base instant".to_string())
}

fn out_of_range(date: NaiveDate) -> EngineError {
    EngineError::OutOfRange(format!("week of {date}"))
}
