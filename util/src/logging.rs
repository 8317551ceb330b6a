use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stdout `tracing` subscriber honoring `RUST_LOG`, defaulting to
/// `info` when unset. Idempotent: a second call is a harmless no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
