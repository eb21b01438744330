//! Tracing subscriber setup for binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TASKFLOW_LOG";

/// Longest filter string accepted before falling back to `off`.
const MAX_FILTER_LEN: usize = 4096;

/// Builds the log filter from `TASKFLOW_LOG`, then `RUST_LOG`.
///
/// Blank, oversized or unparsable values are skipped; with nothing usable
/// logging is off.
#[must_use]
pub fn env_filter() -> EnvFilter {
    filter_from([LOG_ENV, "RUST_LOG"].into_iter().map(|key| std::env::var(key).ok()))
}

fn filter_from(candidates: impl IntoIterator<Item = Option<String>>) -> EnvFilter {
    candidates
        .into_iter()
        .flatten()
        .find_map(|raw| {
            let directives = raw.trim();
            if directives.is_empty() || directives.len() > MAX_FILTER_LEN {
                return None;
            }
            EnvFilter::try_new(directives).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"))
}

/// Installs a global `fmt` subscriber filtered by [`env_filter`].
///
/// Returns `false` when a global subscriber was already installed.
#[must_use]
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter())
        .try_init()
        .is_ok()
}
