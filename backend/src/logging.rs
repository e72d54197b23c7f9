use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{filter::ParseError, fmt, EnvFilter};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[cfg(feature = "loki")]
    #[error("loki exporter: {0}")]
    Loki(#[from] tracing_loki::Error),

    #[error(transparent)]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber: stdout always, Loki when configured.
///
/// Must run inside the tokio runtime, since the Loki exporter is a spawned task.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.filter)?;
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    #[cfg(feature = "loki")]
    {
        if let Some(loki) = &config.loki {
            let (layer, exporter) = tracing_loki::builder()
                .label("service", &loki.service)?
                .label("environment", &loki.environment)?
                .build_url(loki.url.clone())?;

            registry.with(layer).try_init()?;
            tokio::spawn(exporter);
            tracing::info!("✅ Logging to stdout and Loki at {} ({})", loki.url, config.filter);
            return Ok(());
        }
    }

    registry.try_init()?;

    #[cfg(not(feature = "loki"))]
    {
        if config.loki.is_some() {
            tracing::warn!("LOKI_ENABLED is set but the binary was built without the `loki` feature");
        }
    }

    tracing::info!("📊 Logging to stdout ({})", config.filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_is_rejected_before_install() {
        let config = LogConfig {
            filter: "perfchart_backend=loud".to_string(),
            loki: None,
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::Filter(_))));
    }
}
