//! Calendar units used to pick the granularity of boundary, difference and
//! comparison operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::delta::DeltaUnit;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalendarUnit {
    Era,
    Year,
    Month,
    WeekOfMonth,
    WeekOfYear,
    YearForWeekOfYear,
    Weekday,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

impl CalendarUnit {
    pub const ALL: [CalendarUnit; 12] = [
        CalendarUnit::Era,
        CalendarUnit::Year,
        CalendarUnit::Month,
        CalendarUnit::WeekOfMonth,
        CalendarUnit::WeekOfYear,
        CalendarUnit::YearForWeekOfYear,
        CalendarUnit::Weekday,
        CalendarUnit::Day,
        CalendarUnit::Hour,
        CalendarUnit::Minute,
        CalendarUnit::Second,
        CalendarUnit::Nanosecond,
    ];

    /// The delta unit counting steps of this unit, if there is one.
    ///
    /// Week units count weeks, `yearForWeekOfYear` counts years, `weekday`
    /// counts days. Eras have no delta unit.
    pub fn delta_unit(&self) -> Option<DeltaUnit> {
        match self {
            CalendarUnit::Era => None,
            CalendarUnit::Year | CalendarUnit::YearForWeekOfYear => Some(DeltaUnit::Year),
            CalendarUnit::Month => Some(DeltaUnit::Month),
            CalendarUnit::WeekOfMonth | CalendarUnit::WeekOfYear => Some(DeltaUnit::Week),
            CalendarUnit::Weekday | CalendarUnit::Day => Some(DeltaUnit::Day),
            CalendarUnit::Hour => Some(DeltaUnit::Hour),
            CalendarUnit::Minute => Some(DeltaUnit::Minute),
            CalendarUnit::Second => Some(DeltaUnit::Second),
            CalendarUnit::Nanosecond => Some(DeltaUnit::Nanosecond),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CalendarUnit::Era => "era",
            CalendarUnit::Year => "year",
            CalendarUnit::Month => "month",
            CalendarUnit::WeekOfMonth => "weekOfMonth",
            CalendarUnit::WeekOfYear => "weekOfYear",
            CalendarUnit::YearForWeekOfYear => "yearForWeekOfYear",
            CalendarUnit::Weekday => "weekday",
            CalendarUnit::Day => "day",
            CalendarUnit::Hour => "hour",
            CalendarUnit::Minute => "minute",
            CalendarUnit::Second => "second",
            CalendarUnit::Nanosecond => "nanosecond",
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalendarUnit {
    type Err = EngineError;

    /// Accepts the camelCase names plus kebab/snake spellings and `week`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let unit = match key.as_str() {
            "era" => CalendarUnit::Era,
            "year" => CalendarUnit::Year,
            "month" => CalendarUnit::Month,
            "weekofmonth" => CalendarUnit::WeekOfMonth,
            "week" | "weekofyear" => CalendarUnit::WeekOfYear,
            "yearforweekofyear" => CalendarUnit::YearForWeekOfYear,
            "weekday" => CalendarUnit::Weekday,
            "day" => CalendarUnit::Day,
            "hour" => CalendarUnit::Hour,
            "minute" => CalendarUnit::Minute,
            "second" => CalendarUnit::Second,
            "nanosecond" => CalendarUnit::Nanosecond,
            _ => return Err(EngineError::InvalidUnit(format!("'{}'", s.trim()))),
        };
        Ok(unit)
    }
}
