//! Calendar systems.
//!
//! The engine never branches on calendar identity: every calendar-specific
//! rule is reached through the [`CalendarSystem`] capability trait, and a
//! [`CalendarId`] selects the implementation. Calendars map their
//! `(year, month, day)` triples onto the continuous `chrono::NaiveDate` day
//! axis, so day arithmetic and weekday lookup are shared.
//!
//! Years passed to and returned by the trait are *proleptic* (astronomical)
//! years: `0` is 1 BCE, `-1` is 2 BCE. [`CalendarSystem::era_year`] maps them
//! to the `(era, year-of-era)` pair shown to callers.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, IdentifierKind, Result};
use crate::week::WeekRule;

/// Identifier of a supported calendar system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarId {
    /// Proleptic Gregorian calendar; week numbering follows the locale.
    #[default]
    Gregorian,
    /// Gregorian months and years with the ISO 8601 week rule regardless of locale.
    Iso8601,
}

impl CalendarId {
    pub fn identifier(&self) -> &'static str {
        match self {
            CalendarId::Gregorian => "gregorian",
            CalendarId::Iso8601 => "iso8601",
        }
    }

    /// The rule implementation for this calendar.
    pub fn system(&self) -> &'static dyn CalendarSystem {
        match self {
            CalendarId::Gregorian => &Gregorian,
            CalendarId::Iso8601 => &Iso8601,
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for CalendarId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gregorian" => Ok(CalendarId::Gregorian),
            "iso8601" => Ok(CalendarId::Iso8601),
            _ => Err(EngineError::identifier(IdentifierKind::Calendar, s)),
        }
    }
}

/// Era of a year-of-era value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    /// BCE: proleptic years `<= 0`.
    BeforeCommon,
    /// CE: proleptic years `>= 1`.
    Common,
}

impl Era {
    /// Numeric era index (0 = BCE, 1 = CE).
    pub fn index(&self) -> u8 {
        match self {
            Era::BeforeCommon => 0,
            Era::Common => 1,
        }
    }
}

/// Calendar rules consumed by the conversion engine.
pub trait CalendarSystem: fmt::Debug + Send + Sync {
    fn id(&self) -> CalendarId;

    fn is_leap_year(&self, year: i32) -> bool;

    fn months_in_year(&self, _year: i32) -> u32 {
        12
    }

    /// Length of `month`, or 0 if the month does not exist in `year`.
    fn days_in_month(&self, year: i32, month: u32) -> u32;

    fn is_leap_month(&self, _year: i32, _month: u32) -> bool {
        false
    }

    fn days_in_year(&self, year: i32) -> u32 {
        (1..=self.months_in_year(year))
            .map(|m| self.days_in_month(year, m))
            .sum()
    }

    /// `(era, year_of_era)` for a proleptic year.
    fn era_year(&self, year: i32) -> (Era, i32);

    /// Proleptic year for an `(era, year_of_era)` pair.
    fn proleptic_year(&self, era: Era, year_of_era: i32) -> i32;

    /// The day on the shared axis, or `None` if the fields are invalid.
    fn date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate>;

    /// `(year, month, day)` of a day on the shared axis.
    fn fields(&self, date: NaiveDate) -> (i32, u32, u32);

    /// Move `months` months from `year`/`month`.
    fn add_months(&self, year: i32, month: u32, months: i64) -> Option<(i32, u32)> {
        let per_year = i64::from(self.months_in_year(year));
        let index = i64::from(year)
            .checked_mul(per_year)?
            .checked_add(i64::from(month) - 1)?
            .checked_add(months)?;
        let new_year = i32::try_from(index.div_euclid(per_year)).ok()?;
        let new_month = index.rem_euclid(per_year) as u32 + 1;
        Some((new_year, new_month))
    }

    /// A week rule that overrides the locale's, if the calendar fixes one.
    fn week_rule(&self) -> Option<WeekRule> {
        None
    }
}

/// The proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gregorian;

impl CalendarSystem for Gregorian {
    fn id(&self) -> CalendarId {
        CalendarId::Gregorian
    }

    fn is_leap_year(&self, year: i32) -> bool {
        year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
    }

    fn days_in_month(&self, year: i32, month: u32) -> u32 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if self.is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    fn era_year(&self, year: i32) -> (Era, i32) {
        if year >= 1 {
            (Era::Common, year)
        } else {
            (Era::BeforeCommon, 1 - year)
        }
    }

    fn proleptic_year(&self, era: Era, year_of_era: i32) -> i32 {
        match era {
            Era::Common => year_of_era,
            Era::BeforeCommon => 1 - year_of_era,
        }
    }

    fn date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn fields(&self, date: NaiveDate) -> (i32, u32, u32) {
        (date.year(), date.month(), date.day())
    }
}

/// ISO 8601 calendar: Gregorian fields, Monday-first weeks with week 1
/// holding the year's first Thursday.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601;

impl CalendarSystem for Iso8601 {
    fn id(&self) -> CalendarId {
        CalendarId::Iso8601
    }

    fn is_leap_year(&self, year: i32) -> bool {
        Gregorian.is_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: u32) -> u32 {
        Gregorian.days_in_month(year, month)
    }

    fn era_year(&self, year: i32) -> (Era, i32) {
        Gregorian.era_year(year)
    }

    fn proleptic_year(&self, era: Era, year_of_era: i32) -> i32 {
        Gregorian.proleptic_year(era, year_of_era)
    }

    fn date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        Gregorian.date(year, month, day)
    }

    fn fields(&self, date: NaiveDate) -> (i32, u32, u32) {
        Gregorian.fields(date)
    }

    fn week_rule(&self) -> Option<WeekRule> {
        Some(WeekRule::ISO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gregorian_leap_years() {
        assert!(Gregorian.is_leap_year(2000));
        assert!(!Gregorian.is_leap_year(1900));
        assert!(Gregorian.is_leap_year(2024));
        assert!(!Gregorian.is_leap_year(2021));
        // 1 BCE (proleptic 0) and 5 BCE (proleptic -4) are leap years
        assert!(Gregorian.is_leap_year(0));
        assert!(Gregorian.is_leap_year(-4));
        assert!(!Gregorian.is_leap_year(-100));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(Gregorian.days_in_month(2021, 2), 28);
        assert_eq!(Gregorian.days_in_month(2024, 2), 29);
        assert_eq!(Gregorian.days_in_month(2024, 4), 30);
        assert_eq!(Gregorian.days_in_month(2024, 12), 31);
        assert_eq!(Gregorian.days_in_month(2024, 13), 0);
        assert_eq!(Gregorian.days_in_year(2024), 366);
        assert_eq!(Gregorian.days_in_year(2023), 365);
    }

    #[test]
    fn test_era_mapping() {
        assert_eq!(Gregorian.era_year(2024), (Era::Common, 2024));
        assert_eq!(Gregorian.era_year(0), (Era::BeforeCommon, 1));
        assert_eq!(Gregorian.era_year(-43), (Era::BeforeCommon, 44));
        assert_eq!(Gregorian.proleptic_year(Era::BeforeCommon, 44), -43);
        assert_eq!(Gregorian.proleptic_year(Era::Common, 1), 1);
    }

    #[test]
    fn test_add_months_wraps_years() {
        assert_eq!(Gregorian.add_months(2021, 1, 1), Some((2021, 2)));
        assert_eq!(Gregorian.add_months(2021, 12, 1), Some((2022, 1)));
        assert_eq!(Gregorian.add_months(2021, 1, -1), Some((2020, 12)));
        assert_eq!(Gregorian.add_months(2021, 3, -27), Some((2018, 12)));
        assert_eq!(Gregorian.add_months(0, 1, -1), Some((-1, 12)));
    }

    #[test]
    fn test_calendar_id_parsing() {
        assert_eq!("Gregorian".parse::<CalendarId>().unwrap(), CalendarId::Gregorian);
        assert_eq!("ISO8601".parse::<CalendarId>().unwrap(), CalendarId::Iso8601);
        let err = "hebrew".parse::<CalendarId>().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidIdentifier {
                kind: IdentifierKind::Calendar,
                ..
            }
        ));
    }

    #[test]
    fn test_iso_calendar_fixes_week_rule() {
        assert_eq!(CalendarId::Iso8601.system().week_rule(), Some(WeekRule::ISO));
        assert_eq!(CalendarId::Gregorian.system().week_rule(), None);
        assert_eq!(CalendarId::Iso8601.system().id(), CalendarId::Iso8601);
    }
}
