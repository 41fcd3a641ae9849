//! Log output for the `lectio` binary.
//!
//! The library only emits `tracing` events: a `warn!` whenever a stored
//! plan key or start date is replaced by the default, an `info!` when an
//! export is written, and a `debug!` for every reading computed. Nothing
//! is shown unless a subscriber is installed, which `main` does here
//! before dispatching the subcommand.

use tracing_subscriber::EnvFilter;

/// The filter used when `RUST_LOG` is unset: events from this crate only,
/// at a level chosen by the number of `-v` flags. Fallback warnings are
/// always shown; `-v` adds stored exports, `-vv` every computed reading.
fn default_filter(verbosity: u64) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("lectio={}", level)
}

/// Installs the global subscriber. Output goes to stderr, leaving stdout
/// to the readings themselves (so `lectio today > today.txt` stays clean).
pub fn init(verbosity: u64) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_filter(0), "lectio=warn");
        assert_eq!(default_filter(1), "lectio=info");
        assert_eq!(default_filter(2), "lectio=debug");
        assert_eq!(default_filter(7), "lectio=trace");
    }
}
