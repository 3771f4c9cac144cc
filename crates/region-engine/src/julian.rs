//! Julian Day and Modified Julian Day numbers.
//!
//! JD counts days from noon UTC on -4713-11-24 (proleptic Gregorian); MJD is
//! `JD - 2400000.5` and counts from midnight of 1858-11-17. Both are
//! region-independent. Conversions split the integer and fractional day so
//! that the `f64` result keeps sub-millisecond precision for current dates.

use crate::error::{EngineError, Result};
use crate::instant::Instant;

/// JD of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// MJD of the Unix epoch.
pub const UNIX_EPOCH_MJD: f64 = 40_587.0;
/// Offset between JD and MJD.
pub const MJD_OFFSET: f64 = 2_400_000.5;

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_DAY: f64 = 86_400e9;

/// Julian Day of `instant`.
///
/// # Examples
///
/// ```
/// use region_engine::julian;
///
/// let j2000 = "2000-01-01T12:00:00Z".parse().unwrap();
/// assert_eq!(julian::to_julian_day(j2000), 2_451_545.0);
/// ```
pub fn to_julian_day(instant: Instant) -> f64 {
    let (days, fraction) = split_days(instant);
    (days as f64 + UNIX_EPOCH_JD) + fraction
}

/// Modified Julian Day of `instant`.
pub fn to_modified_julian_day(instant: Instant) -> f64 {
    let (days, fraction) = split_days(instant);
    (days as f64 + UNIX_EPOCH_MJD) + fraction
}

/// Instant of a Julian Day number.
///
/// # Errors
///
/// Returns [`EngineError::OutOfRange`] for non-finite values or values
/// outside the representable range.
pub fn from_julian_day(jd: f64) -> Result<Instant> {
    from_epoch_days(jd, UNIX_EPOCH_JD)
}

/// Instant of a Modified Julian Day number.
pub fn from_modified_julian_day(mjd: f64) -> Result<Instant> {
    from_epoch_days(mjd, UNIX_EPOCH_MJD)
}

/// Julian Day of a proleptic Gregorian calendar date, with the time of day
/// carried as the fractional part of `day` (Meeus, *Astronomical
/// Algorithms*, ch. 7).
///
/// # Errors
///
/// Returns [`EngineError::InvalidFieldCombination`] for a month outside
/// `1..=12`, or [`EngineError::OutOfRange`] for a non-finite day.
///
/// # Examples
///
/// ```
/// use region_engine::julian;
///
/// assert_eq!(julian::julian_day_from_calendar(2000, 1, 1.5).unwrap(), 2_451_545.0);
/// ```
pub fn julian_day_from_calendar(year: i32, month: u32, day: f64) -> Result<f64> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidFieldCombination(format!(
            "month {month} is not in 1..=12"
        )));
    }
    if !day.is_finite() {
        return Err(EngineError::OutOfRange(format!("day {day}")));
    }
    let (y, m) = if month <= 2 {
        (f64::from(year) - 1.0, f64::from(month) + 12.0)
    } else {
        (f64::from(year), f64::from(month))
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    Ok((365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5)
}

/// Whole days since the Unix epoch and the fraction of the current day.
fn split_days(instant: Instant) -> (i64, f64) {
    let seconds = instant.unix_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
    let nanos = second_of_day as f64 * 1e9 + f64::from(instant.subsec_nanos());
    (days, nanos / NANOS_PER_DAY)
}

fn from_epoch_days(value: f64, epoch: f64) -> Result<Instant> {
    if !value.is_finite() {
        return Err(EngineError::OutOfRange(format!("day number {value}")));
    }
    // Subtract the integer part of the epoch first to keep the fraction exact.
    let whole = value.floor();
    let fraction = value - whole;
    let days = whole - epoch.floor();
    let fraction = fraction - (epoch - epoch.floor());
    // Well beyond the representable range; keeps the cast below exact.
    if days.abs() > 1e12 {
        return Err(EngineError::OutOfRange(format!("day number {value}")));
    }
    let nanos = days as i128 * NANOS_PER_DAY as i128 + (fraction * NANOS_PER_DAY).round() as i128;
    Instant::from_unix_nanos(nanos)
}
