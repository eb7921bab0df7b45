//! Renderers for the CLI commands.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use vista_plugins::links::Route;
use vista_plugins::{
    DiscoveryReport, PathUrlBuilder, PluginDescriptor, PluginRegistry, RoutingStyle, UrlBuilder,
};

use crate::AppError;

/// JSON document emitted by `show`.
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    url: String,
    plugin: &'a PluginDescriptor,
}

/// Writes one line per plugin: name, display name, and accepted model types.
pub(crate) fn write_list<W: Write>(registry: &PluginRegistry, out: &mut W) -> Result<(), AppError> {
    for name in registry.names() {
        let Some(plugin) = registry.get(name) else {
            continue;
        };
        let model_types: Vec<&str> = plugin
            .data_sources()
            .iter()
            .map(|source| source.model_type().as_str())
            .collect();
        writeln!(
            out,
            "{name}\t{}\t{}",
            plugin.link_text().unwrap_or(name),
            model_types.join(",")
        )?;
    }
    Ok(())
}

/// Writes a plugin's descriptor and base render URL as pretty JSON.
pub(crate) fn write_show<W: Write>(
    plugin: &PluginDescriptor,
    url_prefix: &str,
    out: &mut W,
) -> Result<(), AppError> {
    let route = match plugin.routing() {
        RoutingStyle::Generic => Route::Render {
            plugin: plugin.name(),
        },
        RoutingStyle::LegacyBuiltin => Route::Legacy {
            plugin: plugin.name(),
        },
    };
    let document = ShowOutput {
        url: PathUrlBuilder::new(url_prefix).build(route, &BTreeMap::new()),
        plugin,
    };
    serde_json::to_writer_pretty(&mut *out, &document).map_err(AppError::Serialise)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the discovery outcome; returns `true` when every plugin loaded.
pub(crate) fn write_check<W: Write>(report: &DiscoveryReport, out: &mut W) -> Result<bool, AppError> {
    for directory in &report.disabled {
        writeln!(out, "disabled\t{}", directory.display())?;
    }
    for failure in &report.failures {
        writeln!(out, "failed\t{}\t{}", failure.path.display(), failure.error)?;
    }
    writeln!(
        out,
        "{} loaded, {} disabled, {} failed",
        report.loaded.len(),
        report.disabled.len(),
        report.failures.len()
    )?;
    Ok(report.is_clean())
}
