use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatted tracing subscriber filtered by `RUST_LOG`
/// (defaults to `info`). Calling it again is a no-op.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
