//! Broken-down calendar fields and the overrides used to build instants.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::Era;

/// Calendar fields of an instant as seen in a region.
///
/// Always derived from an [`crate::Instant`] and a [`crate::Region`] by
/// [`crate::authority::to_civil`]; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CivilDateTime {
    pub era: Era,
    /// Year of era (always `>= 1`).
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
    pub weekday: Weekday,
    /// Occurrence of this weekday within the month (1 = first).
    pub weekday_ordinal: u32,
    /// Week of month per the region's week rule; 0 for a short leading week.
    pub week_of_month: u32,
    pub week_of_year: u32,
    /// Proleptic week-based year `week_of_year` belongs to.
    pub year_for_week_of_year: i32,
    pub day_of_year: u32,
    pub quarter: u32,
    /// Total offset from UTC, DST included.
    pub utc_offset_seconds: i32,
    pub is_dst: bool,
    pub is_leap_year: bool,
    pub is_leap_month: bool,
    pub days_in_month: u32,
}

impl CivilDateTime {
    /// Astronomical year (`0` is 1 BCE).
    pub fn proleptic_year(&self) -> i32 {
        match self.era {
            Era::Common => self.year,
            Era::BeforeCommon => 1 - self.year,
        }
    }
}

/// Optional calendar fields for [`crate::authority::build`].
///
/// Unset fields come from the base instant (when one is given) or take their
/// defaults. See `build` for the precedence rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldOverrides {
    pub era: Option<Era>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub nanosecond: Option<u32>,
    pub weekday: Option<Weekday>,
    pub week_of_month: Option<u32>,
    pub week_of_year: Option<u32>,
    pub year_for_week_of_year: Option<i32>,
}

impl FieldOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar date fields (year of era).
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self::new().year(year).month(month).day(day)
    }

    /// Date and time of day.
    pub fn date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self::date(year, month, day)
            .hour(hour)
            .minute(minute)
            .second(second)
    }

    pub fn era(mut self, era: Era) -> Self {
        self.era = Some(era);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn second(mut self, second: u32) -> Self {
        self.second = Some(second);
        self
    }

    pub fn nanosecond(mut self, nanosecond: u32) -> Self {
        self.nanosecond = Some(nanosecond);
        self
    }

    pub fn weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    pub fn week_of_month(mut self, week: u32) -> Self {
        self.week_of_month = Some(week);
        self
    }

    pub fn week_of_year(mut self, week: u32) -> Self {
        self.week_of_year = Some(week);
        self
    }

    pub fn year_for_week_of_year(mut self, year: i32) -> Self {
        self.year_for_week_of_year = Some(year);
        self
    }

    /// Midnight: zero every time-of-day field.
    pub fn at_midnight(self) -> Self {
        self.hour(0).minute(0).second(0).nanosecond(0)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
