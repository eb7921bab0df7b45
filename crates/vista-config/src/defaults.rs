use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Plugin root scanned when none is configured.
pub const DEFAULT_PLUGIN_ROOT: &str = "config/plugins/visualizations";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Plugin roots scanned when none are configured.
#[must_use]
pub fn default_plugin_roots() -> Vec<Utf8PathBuf> {
    vec![Utf8PathBuf::from(DEFAULT_PLUGIN_ROOT)]
}
