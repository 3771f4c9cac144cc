use std::path::PathBuf;

use chrono::Weekday;
use clap::{Parser, Subcommand, ValueEnum};
use region_engine::{CalendarUnit, ComponentDelta, Era, Instant};

/// Region-aware calendar calculator.
#[derive(Parser)]
#[command(
    name = "regcal",
    version,
    about = "Region-aware calendar arithmetic, boundaries, differences and Julian days"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON file with a `default_region` block.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Calendar identifier (gregorian, iso8601).
    #[arg(long, global = true)]
    pub calendar: Option<String>,

    /// IANA timezone name.
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Locale identifier, e.g. en_US.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Show the calendar fields of an instant.
    Civil {
        /// RFC 3339 instant.
        instant: Instant,
    },
    /// Build an instant from calendar fields.
    Compose(ComposeArgs),
    /// Add a delta such as +1mo or -2w3d.
    Add {
        instant: Instant,
        #[arg(allow_hyphen_values = true)]
        delta: ComponentDelta,
    },
    /// First instant of the unit containing an instant.
    StartOf { instant: Instant, unit: CalendarUnit },
    /// Last instant of the unit containing an instant.
    EndOf { instant: Instant, unit: CalendarUnit },
    /// Whole units between two instants.
    Diff {
        from: Instant,
        to: Instant,
        /// Unit to count (repeatable).
        #[arg(short, long = "unit", required = true)]
        units: Vec<CalendarUnit>,
        /// Carry remainders from larger units to smaller ones.
        #[arg(long)]
        breakdown: bool,
    },
    /// Julian Day number of an instant.
    Julian {
        instant: Instant,
        /// Print the Modified Julian Day instead.
        #[arg(long)]
        modified: bool,
    },
    /// Instant of a Julian Day number.
    FromJulian {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        /// Read the value as a Modified Julian Day.
        #[arg(long)]
        modified: bool,
    },
    /// Whether an instant falls on a weekend day of the locale.
    Weekend { instant: Instant },
    /// Whether two instants fall in the same unit.
    Same {
        a: Instant,
        b: Instant,
        unit: CalendarUnit,
    },
}

/// Arguments for the `compose` subcommand.
#[derive(clap::Args)]
pub struct ComposeArgs {
    /// Instant supplying every field not given.
    #[arg(long)]
    pub base: Option<Instant>,
    #[arg(long, value_enum)]
    pub era: Option<EraArg>,
    /// Year of era.
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub month: Option<u32>,
    #[arg(long)]
    pub day: Option<u32>,
    #[arg(long)]
    pub hour: Option<u32>,
    #[arg(long)]
    pub minute: Option<u32>,
    #[arg(long)]
    pub second: Option<u32>,
    #[arg(long)]
    pub nanosecond: Option<u32>,
    /// Weekday name, e.g. Mon or monday.
    #[arg(long)]
    pub weekday: Option<Weekday>,
    #[arg(long)]
    pub week_of_month: Option<u32>,
    #[arg(long)]
    pub week_of_year: Option<u32>,
    #[arg(long, allow_hyphen_values = true)]
    pub year_for_week_of_year: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EraArg {
    Bce,
    Ce,
}

impl From<EraArg> for Era {
    fn from(era: EraArg) -> Self {
        match era {
            EraArg::Bce => Era::BeforeCommon,
            EraArg::Ce => Era::Common,
        }
    }
}
