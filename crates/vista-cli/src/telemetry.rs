//! Diagnostic logging for the `vista` command.
//!
//! Command output goes to stdout; everything emitted through `tracing`
//! (discovery warnings, skipped data sources, coercion fallbacks) goes to
//! stderr so it never mixes with `list` or `show` output.
//!
//! Compact output is meant for a person at a terminal and carries neither
//! timestamps nor targets. JSON output is meant for log collectors and
//! carries both.
//!
//! ```rust
//! use tracing::level_filters::LevelFilter;
//! use vista_cli::telemetry;
//! use vista_config::{Config, LogFormat};
//!
//! let config = Config {
//!     log_filter: "vista_plugins=debug".into(),
//!     log_format: LogFormat::Compact,
//!     ..Config::default()
//! };
//! let filter = telemetry::env_filter(&config).expect("filter parses");
//! assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
//! ```

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt};

use vista_config::{Config, DEFAULT_LOG_FILTER, LogFormat};

static TELEMETRY_GUARD: OnceCell<LogFormat> = OnceCell::new();

/// Handle returned once diagnostics are routed to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Format chosen by the first successful initialisation.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression does not parse.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// Filter expression as configured.
        filter: String,
        /// Parser error from `tracing-subscriber`.
        #[source]
        source: ParseError,
    },
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Builds the level filter for a configuration.
///
/// A blank filter falls back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the expression is malformed.
pub fn env_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    let filter = match config.log_filter().trim() {
        "" => DEFAULT_LOG_FILTER,
        other => other,
    };
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::Filter {
        filter: filter.to_owned(),
        source,
    })
}

/// Builds the stderr subscriber for a configuration without installing it.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter is malformed.
pub fn subscriber(config: &Config) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let filter = env_filter(config)?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_writer(io::stderr);

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(
            builder
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .json()
                .flatten_event(true)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            builder
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .without_time()
                .compact()
                .finish(),
        ),
    })
}

/// Installs the global subscriber the first time it is called.
///
/// Later calls keep the first configuration and report its format.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or another
/// subscriber is already installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let installed = subscriber(config)?;
            tracing::subscriber::set_global_default(installed)
                .map_err(TelemetryError::Subscriber)?;
            Ok(config.log_format())
        })
        .map(|format| TelemetryHandle { format: *format })
}
