//! Diagnostics for `regcal`.
//!
//! Results are JSON on stdout, so every log line goes to stderr. The engine
//! logs default-region changes at `debug` (`-vv`) and how each fold or gap
//! wall time was resolved at `trace` (`-vvv`). `RUST_LOG`, when set, replaces
//! the `-v` mapping.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log targets for this binary and the engine it drives.
const TARGETS: [&str; 2] = ["regcal", "region_engine"];

/// Level for a `-v` count: none warns, `-v` info, `-vv` debug, more traces.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Directives limiting output to [`TARGETS`] at the level for `verbosity`.
fn directives(verbosity: u8) -> String {
    let level = level_for(verbosity);
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
