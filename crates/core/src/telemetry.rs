use tracing_subscriber::{EnvFilter, fmt};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `info` for everything with the
/// engine crate at `debug` so skipped decisions stay visible.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,upkeep_engine=debug"));

    fmt().with_env_filter(filter).with_target(true).init();
}
