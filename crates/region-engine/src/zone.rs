//! Timezone offsets and wall-clock resolution.
//!
//! A wall-clock value maps to zero, one or two instants. The policy here:
//!
//! - **Fold** (clocks set back, the wall time occurs twice): the earlier
//!   instant, i.e. the first occurrence.
//! - **Gap** (clocks set forward, the wall time never occurs): the wall time
//!   is read with the offset in force before the transition, which moves it
//!   forward by the length of the gap. 02:30 in a 02:00→03:00 gap is 03:30.

use chrono::{LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use tracing::trace;

use crate::error::{EngineError, Result};
use crate::instant::Instant;

/// Wall-clock datetime of `instant` in `tz`.
pub fn local_datetime(tz: Tz, instant: Instant) -> NaiveDateTime {
    instant.to_utc().with_timezone(&tz).naive_local()
}

/// Total UTC offset (DST included) in force at `instant`, in seconds.
pub fn offset_seconds(tz: Tz, instant: Instant) -> i32 {
    tz.offset_from_utc_datetime(&instant.to_utc().naive_utc())
        .fix()
        .local_minus_utc()
}

/// Whether daylight saving time is in force at `instant`.
pub fn is_dst(tz: Tz, instant: Instant) -> bool {
    tz.offset_from_utc_datetime(&instant.to_utc().naive_utc())
        .dst_offset()
        != TimeDelta::zero()
}

/// Resolve a wall-clock datetime in `tz` to an instant.
///
/// # Errors
///
/// Returns [`EngineError::OutOfRange`] when the result falls outside the
/// representable range.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> Result<Instant> {
    let utc = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(a, b) => {
            let earliest = a.min(b).with_timezone(&Utc);
            trace!(%local, tz = tz.name(), resolved = %earliest, "wall time in fold, taking first occurrence");
            earliest
        }
        LocalResult::None => {
            let offset = offset_before_gap(tz, local)?;
            let naive_utc = local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
                .ok_or_else(|| out_of_range(local))?;
            let shifted = Utc.from_utc_datetime(&naive_utc);
            trace!(%local, tz = tz.name(), resolved = %shifted, "wall time in gap, using pre-transition offset");
            shifted
        }
    };
    Instant::from_utc(utc)
}

/// Offset in force just before the transition that skipped `local`.
///
/// Reading `local` with one side's offset lands on the other side of the
/// transition, so two lookups from any starting guess yield both offsets.
/// Clocks only skip forward, so the later offset is the larger one, and the
/// instant one second before `local` read with it precedes the transition.
fn offset_before_gap(tz: Tz, local: NaiveDateTime) -> Result<i32> {
    let offset_at = |offset: i32| -> Result<i32> {
        let naive_utc = local
            .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
            .ok_or_else(|| out_of_range(local))?;
        Ok(tz.offset_from_utc_datetime(&naive_utc).fix().local_minus_utc())
    };
    let first = offset_at(offset_at(0)?)?;
    let second = offset_at(first)?;
    offset_at(first.max(second) + 1)
}

/// The instant in `(after, upto]` at which `tz` switched to the offset in
/// force at `upto`, or `None` when `after` already has that offset.
///
/// Assumes at most one transition in the window, which holds for the
/// sub-day windows it is used with.
pub(crate) fn transition_between(tz: Tz, after: Instant, upto: Instant) -> Option<Instant> {
    let target = offset_seconds(tz, upto);
    if after >= upto || offset_seconds(tz, after) == target {
        return None;
    }
    let (mut lo, mut hi) = (after.unix_nanos(), upto.unix_nanos());
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if offset_seconds(tz, Instant::from_unix_nanos(mid).ok()?) == target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Instant::from_unix_nanos(hi).ok()
}

fn out_of_range(local: NaiveDateTime) -> EngineError {
    EngineError::OutOfRange(format!("local time {local} is outside the representable range"))
}
