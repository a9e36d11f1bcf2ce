//! Logging setup shared by Buk binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "BUK_LOG";

/// Install a fmt subscriber writing to stderr.
///
/// `default_filter` is used when `BUK_LOG` is unset or invalid. Calling this
/// more than once is harmless; later calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
