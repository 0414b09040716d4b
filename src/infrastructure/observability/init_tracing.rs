use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable that forces the log format (`json` or `text`).
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "pretty" => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub environment: String,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, filter: impl Into<String>, json: bool) -> Self {
        Self {
            environment: environment.into(),
            filter: filter.into(),
            format: if json { LogFormat::Json } else { LogFormat::Text },
        }
    }

    /// Applies a `LOG_FORMAT` value; unrecognised values keep the configured format.
    pub fn with_format_override(mut self, value: Option<&str>) -> Self {
        if let Some(format) = value.and_then(LogFormat::parse) {
            self.format = format;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
    #[error(transparent)]
    AlreadyInitialized(#[from] TryInitError),
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `config.filter`.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingInitError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()?,
    }

    tracing::info!(
        environment = %config.environment,
        format = ?config.format,
        "Tracing initialized"
    );
    Ok(())
}
