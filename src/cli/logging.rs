use tracing_subscriber::EnvFilter;

use super::args::{LogFormat, LogLevel};

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level`. Calling this twice is harmless; the second
/// call is ignored.
pub fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skiver={}", level.as_str())));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Human => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}
