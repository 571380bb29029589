use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "travel_api_explorer=info,warp=info";

/// Installs the global subscriber; `RUST_LOG` overrides the default filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
