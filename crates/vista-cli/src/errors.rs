//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use vista_plugins::PluginError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error("failed to serialise plugin descriptor: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
