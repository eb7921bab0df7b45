//! Plugin configuration parser.
//!
//! Turns a configuration document into a [`PluginDescriptor`]. Fields fall
//! into two classes: the name, data sources and template must be correct
//! and fail the plugin when they are not, while cosmetic fields such as the
//! render target and link text silently fall back to defaults.
//!
//! A document flagged `disabled` parses to `None`, which is a deliberate
//! skip rather than a failure.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::data_source::parse_data_source;
use crate::descriptor::{PluginDescriptor, RenderTarget, RoutingStyle};
use crate::document::{RawPluginDocument, flag};
use crate::error::PluginError;
use crate::param::parse_params;

/// Extension of plugin configuration documents.
pub const CONFIG_EXTENSION: &str = "json";

/// Parses JSON text into a descriptor.
///
/// `origin` names the document in error messages.
///
/// # Errors
///
/// Returns [`PluginError::Parse`] for malformed JSON and
/// [`PluginError::ConfigValidation`] for structural problems.
pub fn parse_str(text: &str, origin: &Path) -> Result<Option<PluginDescriptor>, PluginError> {
    let document: RawPluginDocument =
        serde_json::from_str(text).map_err(|source| PluginError::Parse {
            path: origin.to_path_buf(),
            source: Arc::new(source),
        })?;
    parse_document(&document)
}

/// Parses a raw document into a descriptor.
///
/// # Errors
///
/// Returns [`PluginError::ConfigValidation`] when the name is missing, no
/// data source survives parsing, the template is missing, or a parameter
/// element is malformed.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use vista_plugins::config::parse_str;
///
/// let text = r#"{
///     "name": "table",
///     "data_sources": [{"model_class": "HistoryDatasetAssociation"}],
///     "template": "table.html"
/// }"#;
/// let plugin = parse_str(text, Path::new("table.json"))
///     .expect("valid document")
///     .expect("not disabled");
/// assert_eq!(plugin.name(), "table");
/// ```
pub fn parse_document(document: &RawPluginDocument) -> Result<Option<PluginDescriptor>, PluginError> {
    let name = document
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PluginError::invalid("<unnamed>", "plugin has no name"))?;
    if flag(document.disabled.as_ref()) {
        return Ok(None);
    }

    let raw_sources = document
        .data_sources
        .as_deref()
        .ok_or_else(|| PluginError::invalid(name, "plugin has no data_sources block"))?;
    let data_sources = raw_sources
        .iter()
        .filter_map(|raw| match parse_data_source(name, raw) {
            Ok(source) => Some(source),
            Err(error) => {
                warn!(plugin = name, %error, "skipping invalid data source");
                None
            }
        })
        .collect::<Vec<_>>();

    let template = document.template.as_deref().unwrap_or_default();
    let (params, modifiers) = match document.params.as_ref() {
        Some(block) => parse_params(name, &block.param, &block.param_modifier)?,
        None => Default::default(),
    };
    let routing = if flag(document.legacy_route.as_ref()) {
        RoutingStyle::LegacyBuiltin
    } else {
        RoutingStyle::Generic
    };

    let descriptor = PluginDescriptor::new(name, data_sources, template)?
        .with_embeddable(flag(document.embeddable.as_ref()))
        .with_description(non_blank(document.description.as_deref()))
        .with_params(params, modifiers)
        .with_link_text(non_blank(document.link_text.as_deref()))
        .with_render_target(RenderTarget::from_config(document.render_target.as_deref()))
        .with_routing(routing);
    Ok(Some(descriptor))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
