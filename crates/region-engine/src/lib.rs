//! # region-engine
//!
//! Region-aware calendar computation.
//!
//! An [`Instant`] is an absolute point on the UTC timeline. A [`Region`] is
//! a calendar system, an IANA timezone and a locale. The engine converts
//! between the two views and does the calendar work that needs both:
//! adding months, finding the start of a week, counting whole units between
//! instants, and Julian day numbers. Timezone offsets, DST folds and gaps,
//! month-end clamping and week numbering are handled inside the engine.
//!
//! ## Modules
//!
//! - [`authority`]: instant ↔ civil fields, canonical construction, `add`
//! - [`boundary`]: `start_of` / `end_of` / `interval_of` a unit
//! - [`difference`]: per-unit differences and greedy breakdowns
//! - [`julian`]: Julian Day and Modified Julian Day numbers
//! - [`predicate`]: same-unit comparisons, relative-day and weekend queries
//! - [`zone`]: offsets and the fold/gap resolution policy
//! - [`registry`]: the process-wide default region
//! - [`zoned`]: [`RegionDateTime`], an instant bound to a region
//! - [`calendar`], [`locale`], [`week`]: the rule sources
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use region_engine::{CalendarUnit, ComponentDelta, Region, RegionDateTime};
//!
//! let ny = Region::new("gregorian", "America/New_York", "en_US").unwrap();
//! let t = RegionDateTime::new("2021-01-31T15:00:00Z".parse().unwrap(), Some(&ny));
//!
//! let next_month = t.add(&"+1mo".parse::<ComponentDelta>().unwrap()).unwrap();
//! assert_eq!(next_month.civil().day, 28);
//! assert_eq!(
//!     next_month.end_of(CalendarUnit::Month).to_string(),
//!     "2021-02-28T23:59:59.999999999-05:00[America/New_York]"
//! );
//! ```

pub mod authority;
pub mod boundary;
pub mod calendar;
pub mod civil;
pub mod config;
pub mod delta;
pub mod difference;
pub mod error;
pub mod instant;
pub mod julian;
pub mod locale;
pub mod predicate;
pub mod region;
pub mod registry;
pub mod unit;
pub mod week;
pub mod zone;
pub mod zoned;

pub use boundary::Interval;
pub use calendar::{CalendarId, CalendarSystem, Era, Gregorian, Iso8601};
pub use civil::{CivilDateTime, FieldOverrides};
pub use config::RegionConfig;
pub use delta::{ComponentDelta, DeltaUnit};
pub use error::{EngineError, IdentifierKind, Result};
pub use instant::Instant;
pub use locale::Locale;
pub use region::Region;
pub use registry::{default_region, reset_default_region, resolve_region, set_default_region};
pub use unit::CalendarUnit;
pub use week::WeekRule;
pub use zoned::{DateSeries, RegionDateTime, RoundingMode};
