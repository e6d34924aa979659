use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` controls the filter; defaults to
/// `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}
