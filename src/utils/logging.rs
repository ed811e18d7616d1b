use tracing_subscriber::{EnvFilter, fmt};

/// Diagnostics go to stderr so decoded bytes and JSON reports own stdout.
pub fn init_logging(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| {
            EnvFilter::new(crate::utils::consts::LOG_LEVEL)
        });

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}
