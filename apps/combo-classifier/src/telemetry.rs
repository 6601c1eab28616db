//! Console tracing setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured log level when set
//! - `observability.logging.format`: `json` or `pretty`
//!
//! # Usage
//!
//! ```rust,ignore
//! use combo_classifier::config::LoggingConfig;
//! use combo_classifier::telemetry::init_tracing;
//!
//! init_tracing(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that classification output on stdout stays
/// machine-readable.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_writer(std::io::stderr);

    if config.format == "json" {
        builder.json().finish().try_init()
    } else {
        builder.finish().try_init()
    }
}
