//! Logging setup.
//!
//! Console output stays human-readable; structured warnings and errors go
//! through `tracing` to stderr so they never interleave with the CSV or
//! summary output on stdout.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Defaults to `info`, `debug` when verbose; `RUST_LOG` overrides both.
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
