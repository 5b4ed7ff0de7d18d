//! Diagnostic logging setup.
//!
//! Stdout belongs to the supervisor (finding lines only), so every log event
//! goes to stderr.

use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "LOGMON_LOG";
/// Set to `json` for JSON lines.
pub const LOG_FORMAT_ENV: &str = "LOGMON_LOG_FORMAT";

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "logmon=info,warn",
        _ => "logmon=debug,info",
    }
}

/// Install the global subscriber. `verbosity` counts `-v` flags and only
/// applies when `LOGMON_LOG` is unset.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let registry = tracing_subscriber::registry().with(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}
