//! [`RegionDateTime`]: an instant bound to the region it is read in.

use std::fmt;

use chrono::{Datelike, SecondsFormat, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::authority;
use crate::boundary::{self, Interval};
use crate::civil::{CivilDateTime, FieldOverrides};
use crate::delta::ComponentDelta;
use crate::difference;
use crate::error::{EngineError, Result};
use crate::instant::Instant;
use crate::julian;
use crate::predicate;
use crate::region::Region;
use crate::registry;
use crate::unit::CalendarUnit;
use crate::zone;

/// An [`Instant`] together with the [`Region`] its calendar fields are read in.
///
/// Constructors taking `Option<&Region>` fall back to
/// [`registry::default_region`] when given `None`.
///
/// # Examples
///
/// ```
/// use region_engine::{CalendarUnit, ComponentDelta, Region, RegionDateTime};
///
/// let rome = Region::new("gregorian", "Europe/Rome", "it_IT").unwrap();
/// let t = RegionDateTime::new("2021-03-27T10:00:00Z".parse().unwrap(), Some(&rome));
/// let next = t.add(&ComponentDelta::days(1)).unwrap();
/// assert_eq!(next.to_string(), "2021-03-28T11:00:00+02:00[Europe/Rome]");
/// assert_eq!(next.start_of(CalendarUnit::Day).to_string(), "2021-03-28T00:00:00+01:00[Europe/Rome]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionDateTime {
    instant: Instant,
    region: Region,
}

/// How [`RegionDateTime::rounded`] picks a multiple of the step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Closest multiple; halfway rounds up.
    #[default]
    Nearest,
    Floor,
    Ceil,
}

impl RegionDateTime {
    pub fn new(instant: Instant, region: Option<&Region>) -> Self {
        Self {
            instant,
            region: registry::resolve_region(region),
        }
    }

    pub fn now(region: Option<&Region>) -> Self {
        Self::new(Instant::now(), region)
    }

    /// Build from fields alone (a year is required).
    pub fn from_fields(fields: &FieldOverrides, region: Option<&Region>) -> Result<Self> {
        let region = registry::resolve_region(region);
        let instant = authority::build(&region, None, fields)?;
        Ok(Self { instant, region })
    }

    /// Replace some fields, keeping the rest from `self`.
    pub fn with_fields(&self, fields: &FieldOverrides) -> Result<Self> {
        let instant = authority::build(&self.region, Some(self.instant), fields)?;
        Ok(self.with_instant(instant))
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The same instant read in another region.
    pub fn convert_to(&self, region: &Region) -> Self {
        Self {
            instant: self.instant,
            region: *region,
        }
    }

    pub fn civil(&self) -> CivilDateTime {
        authority::to_civil(&self.region, self.instant)
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    pub fn add(&self, delta: &ComponentDelta) -> Result<Self> {
        Ok(self.with_instant(authority::add(&self.region, self.instant, delta)?))
    }

    pub fn subtract(&self, delta: &ComponentDelta) -> Result<Self> {
        Ok(self.with_instant(authority::subtract(&self.region, self.instant, delta)?))
    }

    /// Per-unit difference from `self` to `to`.
    pub fn difference(&self, to: &RegionDateTime, units: &[CalendarUnit]) -> Result<ComponentDelta> {
        difference::difference(self, to, units)
    }

    /// Greedy mixed-unit difference from `self` to `to`.
    pub fn breakdown(&self, to: &RegionDateTime, units: &[CalendarUnit]) -> Result<ComponentDelta> {
        difference::breakdown(self, to, units)
    }

    // ── Boundaries ──────────────────────────────────────────────────────

    pub fn start_of(&self, unit: CalendarUnit) -> Self {
        self.with_instant(boundary::start_of(&self.region, self.instant, unit))
    }

    pub fn end_of(&self, unit: CalendarUnit) -> Self {
        self.with_instant(boundary::end_of(&self.region, self.instant, unit))
    }

    pub fn interval_of(&self, unit: CalendarUnit) -> Interval {
        boundary::interval_of(&self.region, self.instant, unit)
    }

    // ── Predicates ──────────────────────────────────────────────────────

    /// Compare with `other` at `unit` granularity, in `self`'s region.
    pub fn compare(&self, other: &RegionDateTime, unit: CalendarUnit) -> std::cmp::Ordering {
        predicate::compare(&self.region, self.instant, other.instant, unit)
    }

    pub fn is_in_same(&self, other: &RegionDateTime, unit: CalendarUnit) -> bool {
        predicate::is_in_same(&self.region, self.instant, other.instant, unit)
    }

    pub fn is_before(&self, other: &RegionDateTime, unit: CalendarUnit) -> bool {
        predicate::is_before(&self.region, self.instant, other.instant, unit)
    }

    pub fn is_after(&self, other: &RegionDateTime, unit: CalendarUnit) -> bool {
        predicate::is_after(&self.region, self.instant, other.instant, unit)
    }

    pub fn is_in_today(&self, now: Instant) -> bool {
        predicate::is_in_today(&self.region, self.instant, now)
    }

    pub fn is_in_yesterday(&self, now: Instant) -> bool {
        predicate::is_in_yesterday(&self.region, self.instant, now)
    }

    pub fn is_in_tomorrow(&self, now: Instant) -> bool {
        predicate::is_in_tomorrow(&self.region, self.instant, now)
    }

    pub fn is_in_weekend(&self) -> bool {
        predicate::is_in_weekend(&self.region, self.instant)
    }

    pub fn is_leap_year(&self) -> bool {
        predicate::is_leap_year(&self.region, self.instant)
    }

    pub fn is_leap_month(&self) -> bool {
        predicate::is_leap_month(&self.region, self.instant)
    }

    pub fn is_in_range(&self, start: Instant, end: Instant, inclusive: bool) -> bool {
        predicate::is_in_range(self.instant, start, end, inclusive)
    }

    pub fn is_close_to(&self, other: &RegionDateTime, precision: TimeDelta) -> bool {
        predicate::is_close_to(self.instant, other.instant, precision)
    }

    pub fn is_in_past(&self, now: Instant) -> bool {
        predicate::is_in_past(self.instant, now)
    }

    pub fn is_in_future(&self, now: Instant) -> bool {
        predicate::is_in_future(self.instant, now)
    }

    // ── Julian days ─────────────────────────────────────────────────────

    pub fn julian_day(&self) -> f64 {
        julian::to_julian_day(self.instant)
    }

    pub fn modified_julian_day(&self) -> f64 {
        julian::to_modified_julian_day(self.instant)
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// The next `weekday` strictly after this date, same wall-clock time.
    pub fn next_weekday(&self, weekday: Weekday) -> Result<Self> {
        let current = self.local_weekday();
        let ahead = (7 + weekday.num_days_from_monday() - current.num_days_from_monday()) % 7;
        let ahead = if ahead == 0 { 7 } else { ahead };
        self.add(&ComponentDelta::days(i64::from(ahead)))
    }

    /// The previous `weekday` strictly before this date, same wall-clock time.
    pub fn previous_weekday(&self, weekday: Weekday) -> Result<Self> {
        let current = self.local_weekday();
        let back = (7 + current.num_days_from_monday() - weekday.num_days_from_monday()) % 7;
        let back = if back == 0 { 7 } else { back };
        self.add(&ComponentDelta::days(-i64::from(back)))
    }

    /// Round to a multiple of `minutes` within the hour.
    ///
    /// Seconds and nanoseconds count toward the position in the hour; the
    /// result always has zero seconds. Rounding up past the last multiple
    /// moves to the next hour.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFieldCombination`] unless `minutes` is
    /// in `1..=60`.
    pub fn rounded(&self, minutes: u32, mode: RoundingMode) -> Result<Self> {
        if !(1..=60).contains(&minutes) {
            return Err(EngineError::InvalidFieldCombination(format!(
                "rounding step must be 1..=60 minutes, got {minutes}"
            )));
        }
        let local = zone::local_datetime(self.region.time_zone(), self.instant);
        let position = i64::from(local.minute()) * 60_000_000_000
            + i64::from(local.second()) * 1_000_000_000
            + i64::from(local.nanosecond());
        let step = i64::from(minutes) * 60_000_000_000;
        let remainder = position % step;
        let floor = position - remainder;
        let target = match mode {
            RoundingMode::Floor => floor,
            RoundingMode::Ceil if remainder == 0 => floor,
            RoundingMode::Ceil => floor + step,
            RoundingMode::Nearest if remainder * 2 >= step => floor + step,
            RoundingMode::Nearest => floor,
        };
        Ok(self.with_instant(self.instant.add_nanos(target - position)?))
    }

    /// Lazily step from `self` by `step` while not past `end`.
    ///
    /// Element `k` is `self + k * step`, so month steps from the 31st land on
    /// each month's last day without drifting.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFieldCombination`] unless `step` has at
    /// least one positive component and no negative ones.
    pub fn series(&self, end: Instant, step: ComponentDelta) -> Result<DateSeries> {
        if !step.is_positive() {
            return Err(EngineError::InvalidFieldCombination(format!(
                "series step must be positive, got {step}"
            )));
        }
        Ok(DateSeries {
            start: *self,
            end,
            step,
            index: 0,
            done: false,
        })
    }

    fn local_weekday(&self) -> Weekday {
        zone::local_datetime(self.region.time_zone(), self.instant).weekday()
    }

    fn with_instant(&self, instant: Instant) -> Self {
        Self {
            instant,
            region: self.region,
        }
    }
}

impl fmt::Display for RegionDateTime {
    /// RFC 3339 in the region's local offset, followed by the zone name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tz = self.region.time_zone();
        let local = self.instant.to_utc().with_timezone(&tz);
        write!(
            f,
            "{}[{}]",
            local.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            tz.name()
        )
    }
}

/// Iterator returned by [`RegionDateTime::series`].
#[derive(Debug, Clone)]
pub struct DateSeries {
    start: RegionDateTime,
    end: Instant,
    step: ComponentDelta,
    index: i64,
    done: bool,
}

impl Iterator for DateSeries {
    type Item = RegionDateTime;

    fn next(&mut self) -> Option<RegionDateTime> {
        if self.done {
            return None;
        }
        let next = self
            .step
            .checked_mul(self.index)
            .and_then(|delta| self.start.add(&delta).ok())
            .filter(|dt| dt.instant <= self.end);
        match next {
            Some(dt) => {
                self.index += 1;
                Some(dt)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for DateSeries {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rome() -> Region {
        Region::new("gregorian", "Europe/Rome", "it_IT").unwrap()
    }

    fn zoned(s: &str, region: &Region) -> RegionDateTime {
        RegionDateTime::new(s.parse().unwrap(), Some(region))
    }

    #[test]
    fn test_display_uses_local_offset() {
        let t = zoned("2021-07-01T10:00:00Z", &rome());
        assert_eq!(t.to_string(), "2021-07-01T12:00:00+02:00[Europe/Rome]");
        let utc = t.convert_to(&Region::utc());
        assert_eq!(utc.to_string(), "2021-07-01T10:00:00+00:00[UTC]");
        assert_eq!(utc.instant(), t.instant());
    }

    #[test]
    fn test_from_and_with_fields() {
        let region = rome();
        let t = RegionDateTime::from_fields(&FieldOverrides::date_time(2021, 5, 20, 9, 15, 0), Some(&region))
            .unwrap();
        assert_eq!(t.to_string(), "2021-05-20T09:15:00+02:00[Europe/Rome]");
        let moved = t.with_fields(&FieldOverrides::new().day(1).minute(0)).unwrap();
        assert_eq!(moved.to_string(), "2021-05-01T09:00:00+02:00[Europe/Rome]");
    }

    #[test]
    fn test_next_and_previous_weekday() {
        let t = zoned("2021-06-16T10:00:00Z", &rome()); // Wednesday
        assert_eq!(
            t.next_weekday(Weekday::Wed).unwrap().to_string(),
            "2021-06-23T12:00:00+02:00[Europe/Rome]"
        );
        assert_eq!(
            t.next_weekday(Weekday::Fri).unwrap().to_string(),
            "2021-06-18T12:00:00+02:00[Europe/Rome]"
        );
        assert_eq!(
            t.previous_weekday(Weekday::Mon).unwrap().to_string(),
            "2021-06-14T12:00:00+02:00[Europe/Rome]"
        );
    }

    #[test]
    fn test_rounded_modes() {
        let utc = Region::utc();
        let t = zoned("2021-06-16T10:07:30Z", &utc);
        assert_eq!(t.rounded(15, RoundingMode::Nearest).unwrap().instant().to_string(), "2021-06-16T10:15:00Z");
        assert_eq!(t.rounded(15, RoundingMode::Floor).unwrap().instant().to_string(), "2021-06-16T10:00:00Z");
        assert_eq!(t.rounded(5, RoundingMode::Ceil).unwrap().instant().to_string(), "2021-06-16T10:10:00Z");
        let late = zoned("2021-06-16T10:50:00Z", &utc);
        assert_eq!(late.rounded(30, RoundingMode::Ceil).unwrap().instant().to_string(), "2021-06-16T11:00:00Z");
        assert!(t.rounded(0, RoundingMode::Floor).is_err());
        assert!(t.rounded(61, RoundingMode::Floor).is_err());
    }

    #[test]
    fn test_series_does_not_drift() {
        let utc = Region::utc();
        let start = zoned("2021-01-31T00:00:00Z", &utc);
        let end: Instant = "2021-05-01T00:00:00Z".parse().unwrap();
        let days: Vec<u32> = start
            .series(end, ComponentDelta::months(1))
            .unwrap()
            .map(|dt| dt.civil().day)
            .collect();
        assert_eq!(days, vec![31, 28, 31, 30]);
    }

    #[test]
    fn test_series_rejects_non_positive_step() {
        let t = zoned("2021-01-31T00:00:00Z", &Region::utc());
        assert!(t.series(t.instant(), ComponentDelta::new()).is_err());
        assert!(t.series(t.instant(), ComponentDelta::days(-1)).is_err());
    }

    #[test]
    fn test_predicates_delegate() {
        let region = rome();
        let a = zoned("2021-06-19T10:00:00Z", &region);
        let b = zoned("2021-06-19T21:30:00Z", &region);
        assert!(a.is_in_same(&b, CalendarUnit::Day));
        assert!(a.is_in_weekend());
        assert!(a.is_before(&b, CalendarUnit::Hour));
        assert!(a.is_close_to(&b, TimeDelta::hours(12)));
        assert!(!a.is_leap_year());
    }
}
