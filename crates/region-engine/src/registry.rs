//! Process-wide default region.
//!
//! The only shared mutable state in the crate. Free functions always take an
//! explicit [`Region`]; only the [`crate::RegionDateTime`] constructors that
//! accept `Option<&Region>` fall back to this holder. `parking_lot::RwLock`
//! never poisons, and readers always see a whole region.

use std::sync::LazyLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::region::Region;

static DEFAULT_REGION: LazyLock<RwLock<Region>> =
    LazyLock::new(|| RwLock::new(Region::system_default()));

/// The current default region (Gregorian, UTC, system locale until changed).
pub fn default_region() -> Region {
    *DEFAULT_REGION.read()
}

/// Replace the default region, returning the previous one.
pub fn set_default_region(region: Region) -> Region {
    let previous = std::mem::replace(&mut *DEFAULT_REGION.write(), region);
    debug!(
        calendar = %region.calendar_id(),
        timezone = region.time_zone().name(),
        locale = %region.locale(),
        "default region changed"
    );
    previous
}

/// Restore the initial default region, returning the previous one.
pub fn reset_default_region() -> Region {
    set_default_region(Region::system_default())
}

/// `region` if given, otherwise the default region.
pub fn resolve_region(region: Option<&Region>) -> Region {
    region.copied().unwrap_or_else(default_region)
}
