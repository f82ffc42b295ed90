//! Tracing subscriber setup

use crate::settings::LoggingConfig;
use crate::MonitorError;
use tracing_subscriber::FmtSubscriber;

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), MonitorError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.max_level()?)
        .with_target(true)
        .with_thread_names(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| MonitorError::Logging(e.to_string()))
}
