//! Week numbering.
//!
//! A [`WeekRule`] pairs the first weekday of the week with the minimum number
//! of days the first week of a year (or month) must contain. Week 1 of a year
//! is the first week holding at least that many days of the year; days before
//! it belong to the last week of the previous week-based year. ISO 8601 is
//! `Monday / 4`, the US convention is `Sunday / 1`.
//!
//! Week-of-month follows the same rule, except that a leading partial week
//! too short to count is week 0 rather than the previous month's last week.

use chrono::{Datelike, Days, NaiveDate, TimeDelta, Weekday};
use serde::Serialize;

use crate::calendar::CalendarSystem;
use crate::error::{EngineError, Result};

/// First weekday plus minimum days in the first week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeekRule {
    first_weekday: Weekday,
    min_days_in_first_week: u8,
}

impl WeekRule {
    /// ISO 8601: weeks start on Monday, week 1 holds the first Thursday.
    pub const ISO: WeekRule = WeekRule {
        first_weekday: Weekday::Mon,
        min_days_in_first_week: 4,
    };

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFieldCombination`] unless
    /// `min_days_in_first_week` is in `1..=7`.
    pub fn new(first_weekday: Weekday, min_days_in_first_week: u8) -> Result<Self> {
        if !(1..=7).contains(&min_days_in_first_week) {
            return Err(EngineError::InvalidFieldCombination(format!(
                "minimum days in first week must be 1..=7, got {min_days_in_first_week}"
            )));
        }
        Ok(Self {
            first_weekday,
            min_days_in_first_week,
        })
    }

    pub(crate) const fn from_parts(first_weekday: Weekday, min_days_in_first_week: u8) -> Self {
        Self {
            first_weekday,
            min_days_in_first_week,
        }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn min_days_in_first_week(&self) -> u8 {
        self.min_days_in_first_week
    }

    /// How many days `weekday` is from the first weekday (0..=6).
    pub fn days_from_week_start(&self, weekday: Weekday) -> u32 {
        (7 + weekday.num_days_from_monday() - self.first_weekday.num_days_from_monday()) % 7
    }

    /// The weekday `offset` days after the first weekday.
    pub fn weekday_at(&self, offset: u32) -> Weekday {
        weekday_from_monday(self.first_weekday.num_days_from_monday() + offset)
    }

    /// The first day of the week containing `date`.
    pub fn week_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        date.checked_sub_days(Days::new(u64::from(self.days_from_week_start(date.weekday()))))
    }

    /// The first day of week 1 of the period (year or month) starting on `period_start`.
    fn first_week_start(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        let rel = self.days_from_week_start(period_start.weekday());
        if 7 - rel >= u32::from(self.min_days_in_first_week) {
            period_start.checked_sub_days(Days::new(u64::from(rel)))
        } else {
            period_start.checked_add_days(Days::new(u64::from(7 - rel)))
        }
    }

    fn year_week_start(&self, calendar: &dyn CalendarSystem, year: i32) -> Option<NaiveDate> {
        self.first_week_start(calendar.date(year, 1, 1)?)
    }

    /// `(year_for_week_of_year, week_of_year)` of `date`.
    pub fn week_of_year(&self, calendar: &dyn CalendarSystem, date: NaiveDate) -> Option<(i32, u32)> {
        let (year, _, _) = calendar.fields(date);
        let this_start = self.year_week_start(calendar, year)?;
        if date < this_start {
            let prev_start = self.year_week_start(calendar, year - 1)?;
            return Some((year - 1, whole_weeks(prev_start, date) + 1));
        }
        if let Some(next_start) = self.year_week_start(calendar, year + 1) {
            if date >= next_start {
                return Some((year + 1, 1));
            }
        }
        Some((year, whole_weeks(this_start, date) + 1))
    }

    /// Number of weeks in the week-based year `year`.
    pub fn weeks_in_year(&self, calendar: &dyn CalendarSystem, year: i32) -> Result<u32> {
        let start = self.year_week_start(calendar, year);
        let next = self.year_week_start(calendar, year + 1);
        match (start, next) {
            (Some(start), Some(next)) => Ok(whole_weeks(start, next)),
            _ => Err(EngineError::OutOfRange(format!("week-based year {year}"))),
        }
    }

    /// The date of `weekday` in week `week` of week-based year `year`.
    pub fn date_for_week_of_year(
        &self,
        calendar: &dyn CalendarSystem,
        year: i32,
        week: u32,
        weekday: Weekday,
    ) -> Result<NaiveDate> {
        let weeks = self.weeks_in_year(calendar, year)?;
        if week == 0 || week > weeks {
            return Err(EngineError::InvalidFieldCombination(format!(
                "week {week} does not exist in week-based year {year} (1..={weeks})"
            )));
        }
        let start = self
            .year_week_start(calendar, year)
            .ok_or_else(|| EngineError::OutOfRange(format!("week-based year {year}")))?;
        let offset = i64::from(week - 1) * 7 + i64::from(self.days_from_week_start(weekday));
        start
            .checked_add_signed(TimeDelta::days(offset))
            .ok_or_else(|| EngineError::OutOfRange(format!("week {week} of {year}")))
    }

    /// Week of month of `date` (0 for a leading partial week that is too short).
    pub fn week_of_month(&self, calendar: &dyn CalendarSystem, date: NaiveDate) -> Option<u32> {
        let (year, month, day) = calendar.fields(date);
        let first = calendar.date(year, month, 1)?;
        let rel = self.days_from_week_start(first.weekday());
        let index = (day - 1 + rel) / 7;
        if 7 - rel >= u32::from(self.min_days_in_first_week) {
            Some(index + 1)
        } else {
            Some(index)
        }
    }

    /// The date of `weekday` in week `week` of `year`/`month`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFieldCombination`] when that date falls
    /// outside the month.
    pub fn date_for_week_of_month(
        &self,
        calendar: &dyn CalendarSystem,
        year: i32,
        month: u32,
        week: u32,
        weekday: Weekday,
    ) -> Result<NaiveDate> {
        let first = calendar.date(year, month, 1).ok_or_else(|| {
            EngineError::InvalidFieldCombination(format!("month {month} of year {year}"))
        })?;
        let start = self
            .first_week_start(first)
            .ok_or_else(|| EngineError::OutOfRange(format!("month {month} of year {year}")))?;
        let offset = (i64::from(week) - 1) * 7 + i64::from(self.days_from_week_start(weekday));
        let date = start
            .checked_add_signed(TimeDelta::days(offset))
            .ok_or_else(|| EngineError::OutOfRange(format!("week {week} of {year}-{month}")))?;
        let (y, m, _) = calendar.fields(date);
        if (y, m) != (year, month) {
            return Err(EngineError::InvalidFieldCombination(format!(
                "{weekday} of week {week} is not in month {month} of year {year}"
            )));
        }
        Ok(date)
    }
}

impl Default for WeekRule {
    fn default() -> Self {
        WeekRule::ISO
    }
}

fn whole_weeks(from: NaiveDate, to: NaiveDate) -> u32 {
    (to.signed_duration_since(from).num_days() / 7) as u32
}

/// Weekday `n` days after Monday (wrapping).
pub(crate) fn weekday_from_monday(n: u32) -> Weekday {
    match n % 7 {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
