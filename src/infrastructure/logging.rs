// Tracing subscriber setup
use tracing_subscriber::EnvFilter;

/// Filter comes from `RUST_LOG`, defaulting to `info` for this crate and
/// `warn` for everything else.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_directives() -> &'static str {
    "warn,widget_dashboard=info,tower_http=info"
}
