//! Diagnostic logging.
//!
//! User-facing status lines go through the crate's `info!`/`success!`/
//! `warning!`/`error!` macros. Everything below that (requests, retries,
//! pagination, filter decisions) is emitted with `tracing` and written to
//! stderr, so it never mixes with the interactive prompts on stdout.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when neither `NOSCRUBS_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

pub fn init_logging() {
    let filter = std::env::var("NOSCRUBS_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
