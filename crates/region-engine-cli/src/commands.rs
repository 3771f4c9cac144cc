use anyhow::{Context, Result};
use region_engine::{
    julian, resolve_region, CivilDateTime, ComponentDelta, FieldOverrides, Instant, RegionDateTime,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{Command, ComposeArgs};

/// An instant with its wall-clock rendering in the active region.
#[derive(Serialize)]
struct Moment {
    instant: Instant,
    local: String,
}

impl From<&RegionDateTime> for Moment {
    fn from(t: &RegionDateTime) -> Self {
        Self {
            instant: t.instant(),
            local: t.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CivilOutput {
    #[serde(flatten)]
    moment: Moment,
    civil: CivilDateTime,
}

#[derive(Serialize)]
struct DifferenceOutput {
    delta: ComponentDelta,
    text: String,
}

#[derive(Serialize)]
struct FlagOutput {
    #[serde(flatten)]
    moment: Moment,
    value: bool,
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn at(instant: Instant) -> RegionDateTime {
    RegionDateTime::new(instant, None)
}

/// Dispatch a parsed subcommand against the default region.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Civil { instant } => {
            let t = at(instant);
            print(&CivilOutput {
                moment: Moment::from(&t),
                civil: t.civil(),
            })
        }
        Command::Compose(args) => compose(args),
        Command::Add { instant, delta } => {
            info!(%instant, %delta, "adding delta");
            let moved = at(instant).add(&delta)?;
            print(&Moment::from(&moved))
        }
        Command::StartOf { instant, unit } => print(&Moment::from(&at(instant).start_of(unit))),
        Command::EndOf { instant, unit } => print(&Moment::from(&at(instant).end_of(unit))),
        Command::Diff {
            from,
            to,
            units,
            breakdown,
        } => {
            let (from, to) = (at(from), at(to));
            let delta = if breakdown {
                from.breakdown(&to, &units)?
            } else {
                from.difference(&to, &units)?
            };
            print(&DifferenceOutput {
                text: delta.to_string(),
                delta,
            })
        }
        Command::Julian { instant, modified } => {
            let t = at(instant);
            let value = if modified {
                t.modified_julian_day()
            } else {
                t.julian_day()
            };
            print(&serde_json::json!({ "instant": instant, "value": value }))
        }
        Command::FromJulian { value, modified } => {
            let instant = if modified {
                julian::from_modified_julian_day(value)?
            } else {
                julian::from_julian_day(value)?
            };
            print(&Moment::from(&at(instant)))
        }
        Command::Weekend { instant } => {
            let t = at(instant);
            print(&FlagOutput {
                value: t.is_in_weekend(),
                moment: Moment::from(&t),
            })
        }
        Command::Same { a, b, unit } => {
            let same = at(a).is_in_same(&at(b), unit);
            print(&serde_json::json!({ "unit": unit, "value": same }))
        }
    }
}

fn compose(args: ComposeArgs) -> Result<()> {
    let fields = FieldOverrides {
        era: args.era.map(Into::into),
        year: args.year,
        month: args.month,
        day: args.day,
        hour: args.hour,
        minute: args.minute,
        second: args.second,
        nanosecond: args.nanosecond,
        weekday: args.weekday,
        week_of_month: args.week_of_month,
        week_of_year: args.week_of_year,
        year_for_week_of_year: args.year_for_week_of_year,
    };
    let region = resolve_region(None);
    info!(timezone = region.time_zone().name(), ?fields, "composing instant");
    let t = match args.base {
        Some(base) => at(base).with_fields(&fields)?,
        None => RegionDateTime::from_fields(&fields, Some(&region))?,
    };
    print(&Moment::from(&t))
}
