//! `tracing` subscriber setup.
//!
//! Filter comes from `GDP_LOG` (env-filter syntax) and falls back to the level
//! the caller picks. `GDP_LOG_JSON=1` switches to JSON lines. Output goes to
//! stderr so stdout stays clean for reports.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILTER_ENV: &str = "GDP_LOG";
pub const LOG_JSON_ENV: &str = "GDP_LOG_JSON";

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = if env_bool(LOG_JSON_ENV) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    // Already installed (tests, repeated calls).
    let _ = result;
}

fn env_bool(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
