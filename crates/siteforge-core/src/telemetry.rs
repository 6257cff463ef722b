//! Tracing initialisation for SiteForge binaries.
//!
//! Call [`init_tracing`] once at program start. Later calls are no-ops,
//! since the global subscriber can only be installed once per process.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for terminals.
    Text,
    /// Newline-delimited JSON for log aggregation pipelines.
    Json,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence for filtering; `level` is the default
/// verbosity when it is not set.
pub fn init_tracing(format: LogFormat, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).json())
                .try_init()
                .ok();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false))
                .try_init()
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(LogFormat::Text, Level::INFO);
        init_tracing(LogFormat::Json, Level::DEBUG);
    }
}
