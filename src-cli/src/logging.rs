//! Log setup: `tracing` events to stderr through a non-blocking writer.
//!
//! Filter comes from `UNIQUE_PASSWORDS_LOG` (`EnvFilter` syntax), `warn`
//! by default. Stdout stays reserved for command output.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "UNIQUE_PASSWORDS_LOG";

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered events are flushed.
#[must_use]
pub fn init() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed (tests, embedding).
        tracing::debug!("global subscriber already set");
    }
    guard
}
