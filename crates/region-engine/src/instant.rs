//! Absolute points on the UTC timeline.
//!
//! An [`Instant`] carries no timezone, calendar or locale: it is the single
//! source of truth from which every calendar view is derived. Internally it
//! wraps `chrono::DateTime<Utc>` restricted to the range
//! `-262000-01-01T00:00:00Z ..= +262000-12-31T23:59:59.999999999Z`, which
//! keeps every local wall-clock value and the neighbouring calendar years
//! representable for the conversions in [`crate::authority`].

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Unix seconds of `-262000-01-01T00:00:00Z`.
const MIN_UNIX_SECONDS: i64 = -8_330_088_643_200;
/// Unix seconds of `+262000-12-31T23:59:59Z`.
const MAX_UNIX_SECONDS: i64 = 8_205_785_827_199;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// An absolute moment with nanosecond resolution.
///
/// Totally ordered and hashable. Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateTime<Utc>", into = "DateTime<Utc>")]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// The earliest representable instant.
    pub fn min_value() -> Self {
        Instant(DateTime::from_timestamp(MIN_UNIX_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    /// The latest representable instant.
    pub fn max_value() -> Self {
        Instant(
            DateTime::from_timestamp(MAX_UNIX_SECONDS, 999_999_999)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// The current system time.
    pub fn now() -> Self {
        Instant(Utc::now())
    }

    /// Wrap a `DateTime<Utc>`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfRange`] outside the representable range.
    pub fn from_utc(dt: DateTime<Utc>) -> Result<Self> {
        if (MIN_UNIX_SECONDS..=MAX_UNIX_SECONDS).contains(&dt.timestamp()) {
            Ok(Instant(dt))
        } else {
            Err(EngineError::OutOfRange(format!(
                "{} is outside the representable range",
                dt.to_rfc3339()
            )))
        }
    }

    /// Build from Unix seconds plus a sub-second nanosecond part.
    pub fn from_unix(seconds: i64, nanos: u32) -> Result<Self> {
        let dt = DateTime::from_timestamp(seconds, nanos).ok_or_else(|| {
            EngineError::OutOfRange(format!("unix time {seconds}s {nanos}ns"))
        })?;
        Self::from_utc(dt)
    }

    /// Build from nanoseconds since the Unix epoch.
    pub fn from_unix_nanos(nanos: i128) -> Result<Self> {
        let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND))
            .map_err(|_| EngineError::OutOfRange(format!("unix time {nanos}ns")))?;
        // rem_euclid of a positive modulus is in 0..1e9
        let sub = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        Self::from_unix(seconds, sub)
    }

    /// Whole seconds since the Unix epoch (floored).
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Nanoseconds past [`Instant::unix_seconds`], in `0..1_000_000_000`.
    pub fn subsec_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// Nanoseconds since the Unix epoch.
    pub fn unix_nanos(&self) -> i128 {
        self.unix_seconds() as i128 * NANOS_PER_SECOND + self.subsec_nanos() as i128
    }

    /// The wrapped UTC datetime.
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Add a signed duration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfRange`] when the result leaves the
    /// representable range.
    pub fn checked_add(self, delta: TimeDelta) -> Result<Self> {
        let dt = self.0.checked_add_signed(delta).ok_or_else(|| {
            EngineError::OutOfRange(format!("{self} + {delta} overflows"))
        })?;
        Self::from_utc(dt)
    }

    /// Subtract a signed duration.
    pub fn checked_sub(self, delta: TimeDelta) -> Result<Self> {
        let dt = self.0.checked_sub_signed(delta).ok_or_else(|| {
            EngineError::OutOfRange(format!("{self} - {delta} overflows"))
        })?;
        Self::from_utc(dt)
    }

    /// Add a signed number of nanoseconds.
    pub fn add_nanos(self, nanos: i64) -> Result<Self> {
        self.checked_add(TimeDelta::nanoseconds(nanos))
    }

    /// Elapsed time from `earlier` to `self` (negative if `earlier` is later).
    pub fn duration_since(&self, earlier: Instant) -> TimeDelta {
        self.0.signed_duration_since(earlier.0)
    }
}

impl Sub for Instant {
    type Output = TimeDelta;

    fn sub(self, rhs: Instant) -> TimeDelta {
        self.duration_since(rhs)
    }
}

impl TryFrom<DateTime<Utc>> for Instant {
    type Error = EngineError;

    fn try_from(dt: DateTime<Utc>) -> Result<Self> {
        Instant::from_utc(dt)
    }
}

impl From<Instant> for DateTime<Utc> {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for Instant {
    type Err = EngineError;

    /// Parse an RFC 3339 string (any offset) into an instant.
    fn from_str(s: &str) -> Result<Self> {
        let dt = DateTime::parse_from_rfc3339(s.trim())
            .map_err(|e| EngineError::InvalidDatetime(format!("'{}': {}", s, e)))?;
        Self::from_utc(dt.with_timezone(&Utc))
    }
}
