use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::TracingConfig;

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to init subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a console subscriber as the global default.
///
/// `RUST_LOG` takes precedence over `config.level`. Does nothing when the
/// config is disabled.
pub fn init_tracing(config: &TracingConfig) -> Result<(), ObservabilityError> {
    if !config.enabled {
        return Ok(());
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_directive())?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_noop() {
        assert!(init_tracing(&TracingConfig::disabled()).is_ok());
    }
}
