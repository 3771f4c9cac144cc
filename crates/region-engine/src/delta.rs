//! Component deltas: sparse signed offsets per calendar unit.

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Units a [`ComponentDelta`] can carry, in canonical (descending) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

impl DeltaUnit {
    /// All units, largest first.
    pub const DESCENDING: [DeltaUnit; 8] = [
        DeltaUnit::Year,
        DeltaUnit::Month,
        DeltaUnit::Week,
        DeltaUnit::Day,
        DeltaUnit::Hour,
        DeltaUnit::Minute,
        DeltaUnit::Second,
        DeltaUnit::Nanosecond,
    ];

    /// Whether the unit moves the wall-clock date (as opposed to elapsed time).
    pub fn is_calendar(&self) -> bool {
        matches!(
            self,
            DeltaUnit::Year | DeltaUnit::Month | DeltaUnit::Week | DeltaUnit::Day
        )
    }

    /// Length in nanoseconds of a clock unit.
    pub(crate) fn nanos(&self) -> Option<i64> {
        match self {
            DeltaUnit::Hour => Some(3_600_000_000_000),
            DeltaUnit::Minute => Some(60_000_000_000),
            DeltaUnit::Second => Some(1_000_000_000),
            DeltaUnit::Nanosecond => Some(1),
            _ => None,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            DeltaUnit::Year => "y",
            DeltaUnit::Month => "mo",
            DeltaUnit::Week => "w",
            DeltaUnit::Day => "d",
            DeltaUnit::Hour => "h",
            DeltaUnit::Minute => "m",
            DeltaUnit::Second => "s",
            DeltaUnit::Nanosecond => "ns",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "y" => Some(DeltaUnit::Year),
            "mo" => Some(DeltaUnit::Month),
            "w" => Some(DeltaUnit::Week),
            "d" => Some(DeltaUnit::Day),
            "h" => Some(DeltaUnit::Hour),
            "m" => Some(DeltaUnit::Minute),
            "s" => Some(DeltaUnit::Second),
            "ns" => Some(DeltaUnit::Nanosecond),
            _ => None,
        }
    }
}

/// Signed offsets keyed by unit. A zero field is an absent unit.
///
/// All components are applied together, largest unit first; see
/// [`crate::authority::add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentDelta {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub nanoseconds: i64,
}

impl ComponentDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// A delta with a single non-zero unit.
    pub fn of(unit: DeltaUnit, value: i64) -> Self {
        let mut delta = Self::default();
        delta.set(unit, value);
        delta
    }

    pub fn years(value: i64) -> Self {
        Self::of(DeltaUnit::Year, value)
    }

    pub fn months(value: i64) -> Self {
        Self::of(DeltaUnit::Month, value)
    }

    pub fn weeks(value: i64) -> Self {
        Self::of(DeltaUnit::Week, value)
    }

    pub fn days(value: i64) -> Self {
        Self::of(DeltaUnit::Day, value)
    }

    pub fn hours(value: i64) -> Self {
        Self::of(DeltaUnit::Hour, value)
    }

    pub fn minutes(value: i64) -> Self {
        Self::of(DeltaUnit::Minute, value)
    }

    pub fn seconds(value: i64) -> Self {
        Self::of(DeltaUnit::Second, value)
    }

    pub fn nanoseconds(value: i64) -> Self {
        Self::of(DeltaUnit::Nanosecond, value)
    }

    /// Builder-style setter.
    pub fn with(mut self, unit: DeltaUnit, value: i64) -> Self {
        self.set(unit, value);
        self
    }

    pub fn get(&self, unit: DeltaUnit) -> i64 {
        match unit {
            DeltaUnit::Year => self.years,
            DeltaUnit::Month => self.months,
            DeltaUnit::Week => self.weeks,
            DeltaUnit::Day => self.days,
            DeltaUnit::Hour => self.hours,
            DeltaUnit::Minute => self.minutes,
            DeltaUnit::Second => self.seconds,
            DeltaUnit::Nanosecond => self.nanoseconds,
        }
    }

    pub fn set(&mut self, unit: DeltaUnit, value: i64) {
        let slot = match unit {
            DeltaUnit::Year => &mut self.years,
            DeltaUnit::Month => &mut self.months,
            DeltaUnit::Week => &mut self.weeks,
            DeltaUnit::Day => &mut self.days,
            DeltaUnit::Hour => &mut self.hours,
            DeltaUnit::Minute => &mut self.minutes,
            DeltaUnit::Second => &mut self.seconds,
            DeltaUnit::Nanosecond => &mut self.nanoseconds,
        };
        *slot = value;
    }

    pub fn is_zero(&self) -> bool {
        DeltaUnit::DESCENDING.iter().all(|u| self.get(*u) == 0)
    }

    /// Whether any year/month/week/day component is set.
    pub fn has_calendar_part(&self) -> bool {
        DeltaUnit::DESCENDING
            .iter()
            .any(|u| u.is_calendar() && self.get(*u) != 0)
    }

    /// Non-zero components, largest unit first.
    pub fn components(&self) -> impl Iterator<Item = (DeltaUnit, i64)> + '_ {
        DeltaUnit::DESCENDING
            .iter()
            .map(|u| (*u, self.get(*u)))
            .filter(|(_, v)| *v != 0)
    }

    /// Every component multiplied by `factor`, or `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Self> {
        let mut out = Self::default();
        for unit in DeltaUnit::DESCENDING {
            out.set(unit, self.get(unit).checked_mul(factor)?);
        }
        Some(out)
    }

    /// Whether every component is `>= 0` and at least one is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && DeltaUnit::DESCENDING.iter().all(|u| self.get(*u) >= 0)
    }
}

impl Neg for ComponentDelta {
    type Output = ComponentDelta;

    /// Negates every component (saturating at `i64::MAX` for `i64::MIN`).
    fn neg(self) -> ComponentDelta {
        let mut out = ComponentDelta::default();
        for unit in DeltaUnit::DESCENDING {
            out.set(unit, self.get(unit).saturating_neg());
        }
        out
    }
}

impl fmt::Display for ComponentDelta {
    /// Compact form, e.g. `+1y2mo`, `-3d12h`, `+1mo-1d`, or `+0s` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.components().peekable();
        if parts.peek().is_none() {
            return f.write_str("+0s");
        }
        let all_negative = self.components().all(|(_, v)| v < 0);
        if all_negative {
            f.write_str("-")?;
            for (unit, v) in parts {
                write!(f, "{}{}", v.unsigned_abs(), unit.suffix())?;
            }
        } else {
            for (unit, v) in parts {
                write!(f, "{:+}{}", v, unit.suffix())?;
            }
        }
        Ok(())
    }
}

impl FromStr for ComponentDelta {
    type Err = EngineError;

    /// Parse a delta string such as `+1mo`, `-2w3d`, `+1y2mo3w4d5h6m7s8ns`.
    ///
    /// A leading `+` or `-` is required; it applies to the following
    /// components until the next sign. Repeated units accumulate.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EngineError::InvalidDelta("empty delta".to_string()));
        }
        if !s.starts_with(['+', '-']) {
            return Err(EngineError::InvalidDelta(format!(
                "delta must start with '+' or '-': '{s}'"
            )));
        }

        let mut delta = ComponentDelta::default();
        let mut sign = 1i64;
        let mut num_buf = String::new();
        let mut unit_buf = String::new();
        let mut found_any = false;

        let mut flush = |num_buf: &mut String, unit_buf: &mut String, sign: i64| -> Result<()> {
            if num_buf.is_empty() {
                return Err(EngineError::InvalidDelta(format!(
                    "expected number before '{unit_buf}' in '{s}'"
                )));
            }
            let n: i64 = num_buf
                .parse()
                .map_err(|_| EngineError::InvalidDelta(format!("invalid number in '{s}'")))?;
            let unit = DeltaUnit::from_suffix(&unit_buf.to_ascii_lowercase()).ok_or_else(|| {
                EngineError::InvalidDelta(format!("unknown unit '{unit_buf}' in '{s}'"))
            })?;
            let total = delta
                .get(unit)
                .checked_add(sign * n)
                .ok_or_else(|| EngineError::InvalidDelta(format!("overflow in '{s}'")))?;
            delta.set(unit, total);
            num_buf.clear();
            unit_buf.clear();
            Ok(())
        };

        for ch in s.chars() {
            match ch {
                '+' | '-' => {
                    if !unit_buf.is_empty() {
                        flush(&mut num_buf, &mut unit_buf, sign)?;
                        found_any = true;
                    } else if !num_buf.is_empty() {
                        return Err(EngineError::InvalidDelta(format!(
                            "number without unit before '{ch}' in '{s}'"
                        )));
                    }
                    sign = if ch == '+' { 1 } else { -1 };
                }
                c if c.is_ascii_digit() => {
                    if !unit_buf.is_empty() {
                        flush(&mut num_buf, &mut unit_buf, sign)?;
                        found_any = true;
                    }
                    num_buf.push(c);
                }
                c if c.is_ascii_alphabetic() => unit_buf.push(c),
                c => {
                    return Err(EngineError::InvalidDelta(format!(
                        "unexpected character '{c}' in '{s}'"
                    )));
                }
            }
        }

        if !unit_buf.is_empty() {
            flush(&mut num_buf, &mut unit_buf, sign)?;
            found_any = true;
        } else if !num_buf.is_empty() {
            return Err(EngineError::InvalidDelta(format!(
                "number without unit at end of '{s}'"
            )));
        }

        if !found_any {
            return Err(EngineError::InvalidDelta(format!(
                "no valid components in '{s}'"
            )));
        }

        Ok(delta)
    }
}
