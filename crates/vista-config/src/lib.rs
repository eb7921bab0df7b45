//! Layered configuration for the Vista plugin tooling.
//!
//! Values are merged from built-in defaults, an optional configuration file
//! (`--config-path` or `VISTA_CONFIG_PATH`), `VISTA_*` environment variables,
//! and command-line flags, later layers taking precedence.

mod defaults;
mod logging;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use self::defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PLUGIN_ROOT, default_log_filter, default_log_filter_string,
    default_log_format, default_plugin_roots,
};
pub use self::logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the Vista binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VISTA")]
pub struct Config {
    /// Directories scanned for plugin subdirectories. Empty means the
    /// built-in default root.
    #[serde(default)]
    pub plugin_roots: Vec<Utf8PathBuf>,
    /// Tracing filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Path prefix prepended to generated plugin links.
    #[serde(default)]
    #[ortho_config(default = String::new())]
    pub url_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_roots: Vec::new(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            url_prefix: String::new(),
        }
    }
}

impl Config {
    /// Plugin roots to scan, falling back to [`DEFAULT_PLUGIN_ROOT`].
    #[must_use]
    pub fn plugin_roots(&self) -> Vec<Utf8PathBuf> {
        if self.plugin_roots.is_empty() {
            default_plugin_roots()
        } else {
            self.plugin_roots.clone()
        }
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Path prefix for generated links.
    #[must_use]
    pub fn url_prefix(&self) -> &str {
        self.url_prefix.as_str()
    }
}
