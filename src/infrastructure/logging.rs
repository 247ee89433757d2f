use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{self, LogFormat};

pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl From<&config::LoggingConfig> for LoggingConfig {
    fn from(config: &config::LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            format: config.format.clone(),
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(&config.level);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }

    tracing::info!("Logging initialized with level: {}", config.level);
}
