//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Install the global fmt subscriber, writing to stderr.
///
/// The filter is read from `TACH_LOG` when set; otherwise it defaults to
/// `warn`, or `debug` when `verbose` is true. Calling this more than once is
/// harmless: later calls leave the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
