//! Logger setup for the `dtkit` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! whoever embeds it.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "dtkit=debug" } else { "dtkit=info" }
}

/// Install a compact stderr logger. `RUST_LOG` wins over `verbose` when set.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
