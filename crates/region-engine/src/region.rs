//! Regions: the (calendar, timezone, locale) context of calendar fields.

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarId, CalendarSystem};
use crate::config::RegionConfig;
use crate::error::{EngineError, IdentifierKind, Result};
use crate::locale::Locale;
use crate::week::WeekRule;

/// An immutable calendar/timezone/locale triple.
///
/// Two regions with equal fields are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RegionConfig", try_from = "RegionConfig")]
pub struct Region {
    calendar: CalendarId,
    time_zone: Tz,
    locale: Locale,
}

impl Region {
    /// Build a region from three identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidIdentifier`] naming the first identifier
    /// that does not resolve. No default is substituted.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_engine::Region;
    ///
    /// let rome = Region::new("gregorian", "Europe/Rome", "it_IT").unwrap();
    /// assert_eq!(rome.time_zone().name(), "Europe/Rome");
    /// assert!(Region::new("gregorian", "Europe/Atlantis", "it_IT").is_err());
    /// ```
    pub fn new(calendar: &str, time_zone: &str, locale: &str) -> Result<Self> {
        Ok(Self {
            calendar: calendar.parse()?,
            time_zone: parse_timezone(time_zone)?,
            locale: locale.parse()?,
        })
    }

    pub fn from_parts(calendar: CalendarId, time_zone: Tz, locale: Locale) -> Self {
        Self {
            calendar,
            time_zone,
            locale,
        }
    }

    /// Gregorian calendar, UTC, `en_US`.
    pub fn utc() -> Self {
        Self::from_parts(CalendarId::Gregorian, Tz::UTC, Locale::EN_US)
    }

    /// Gregorian calendar, UTC, and the process locale.
    pub fn system_default() -> Self {
        Self::from_parts(CalendarId::Gregorian, Tz::UTC, Locale::system())
    }

    pub fn calendar_id(&self) -> CalendarId {
        self.calendar
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn calendar(&self) -> &'static dyn CalendarSystem {
        self.calendar.system()
    }

    /// The calendar's fixed week rule if it has one, otherwise the locale's.
    pub fn week_rule(&self) -> WeekRule {
        self.calendar()
            .week_rule()
            .unwrap_or_else(|| self.locale.week_rule())
    }

    pub fn weekend(&self) -> &'static [Weekday] {
        self.locale.weekend()
    }

    pub fn with_calendar(self, calendar: CalendarId) -> Self {
        Self { calendar, ..self }
    }

    pub fn with_time_zone(self, time_zone: Tz) -> Self {
        Self { time_zone, ..self }
    }

    pub fn with_locale(self, locale: Locale) -> Self {
        Self { locale, ..self }
    }
}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.calendar.hash(state);
        self.time_zone.name().hash(state);
        self.locale.hash(state);
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::utc()
    }
}

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    Tz::from_str(s.trim()).map_err(|_| EngineError::identifier(IdentifierKind::TimeZone, s))
}
