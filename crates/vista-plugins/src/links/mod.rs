//! Link synthesis for objects a plugin can render.
//!
//! For each registered plugin the [`LinkBuilder`] picks the first data
//! source that applies to the candidate, evaluates its output rules, encodes
//! identifiers, and asks the [`UrlBuilder`] for the final address. Raw
//! numeric identifiers never reach a URL.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;

use crate::descriptor::{PluginDescriptor, RenderTarget, RoutingStyle};
use crate::error::CodecError;
use crate::object::{Attr, DomainObject, TypeRegistry};
use crate::registry::PluginRegistry;

/// Characters escaped inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Reversible mapping between numeric keys and opaque strings.
pub trait IdCodec {
    /// Encodes a numeric identifier.
    fn encode(&self, id: u64) -> String;

    /// Decodes an opaque identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the text is not a valid encoding.
    fn decode(&self, encoded: &str) -> Result<u64, CodecError>;
}

/// Route a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// The shared render route for a plugin.
    Render {
        /// Plugin name.
        plugin: &'a str,
    },
    /// The dedicated route of a built-in plugin.
    Legacy {
        /// Plugin name.
        plugin: &'a str,
    },
}

/// Collaborator turning a route and parameters into an absolute path.
pub trait UrlBuilder {
    /// Builds the URL.
    fn build(&self, route: Route<'_>, params: &BTreeMap<String, String>) -> String;
}

/// [`UrlBuilder`] producing `<prefix>/visualizations/<name>/show?<query>`
/// for generic plugins and `<prefix>/visualization/<name>?<query>` for
/// built-ins.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use vista_plugins::links::{PathUrlBuilder, Route, UrlBuilder};
///
/// let urls = PathUrlBuilder::new("/galaxy");
/// let params = BTreeMap::from([("dataset_id".to_owned(), "f2db41e1".to_owned())]);
/// assert_eq!(
///     urls.build(Route::Render { plugin: "scatter plot" }, &params),
///     "/galaxy/visualizations/scatter%20plot/show?dataset_id=f2db41e1"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathUrlBuilder {
    prefix: String,
}

impl PathUrlBuilder {
    /// Creates a builder rooted at `prefix`; trailing slashes are ignored.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl UrlBuilder for PathUrlBuilder {
    fn build(&self, route: Route<'_>, params: &BTreeMap<String, String>) -> String {
        let path = match route {
            Route::Render { plugin } => format!(
                "{}/visualizations/{}/show",
                self.prefix,
                utf8_percent_encode(plugin, PATH_SEGMENT)
            ),
            Route::Legacy { plugin } => format!(
                "{}/visualization/{}",
                self.prefix,
                utf8_percent_encode(plugin, PATH_SEGMENT)
            ),
        };
        if params.is_empty() {
            return path;
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{path}?{query}")
    }
}

/// A renderable link to a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDescriptor {
    /// Plugin the link invokes.
    pub plugin: String,
    /// Absolute path including encoded parameters.
    pub url: String,
    /// Text shown to users.
    pub display_name: String,
    /// Frame the link opens in.
    pub render_target: RenderTarget,
    /// Whether the plugin may be embedded.
    pub embeddable: bool,
}

/// Synthesises links for candidate objects.
pub struct LinkBuilder<'a> {
    registry: &'a PluginRegistry,
    codec: &'a dyn IdCodec,
    urls: &'a dyn UrlBuilder,
    types: &'a dyn TypeRegistry,
}

impl<'a> LinkBuilder<'a> {
    /// Creates a builder over a registry and its collaborators.
    #[must_use]
    pub const fn new(
        registry: &'a PluginRegistry,
        codec: &'a dyn IdCodec,
        urls: &'a dyn UrlBuilder,
        types: &'a dyn TypeRegistry,
    ) -> Self {
        Self {
            registry,
            codec,
            urls,
            types,
        }
    }

    /// Returns one link per plugin able to render the candidate, sorted by
    /// plugin name.
    #[must_use]
    pub fn links_for(&self, candidate: &dyn DomainObject) -> Vec<LinkDescriptor> {
        let mut links: Vec<LinkDescriptor> = self
            .registry
            .all()
            .filter_map(|plugin| self.link_for(plugin, candidate))
            .collect();
        links.sort_by(|a, b| a.plugin.cmp(&b.plugin));
        links
    }

    /// Builds a link from the first applicable data source of a plugin.
    #[must_use]
    pub fn link_for(
        &self,
        plugin: &PluginDescriptor,
        candidate: &dyn DomainObject,
    ) -> Option<LinkDescriptor> {
        let source = plugin
            .data_sources()
            .iter()
            .find(|source| source.applies_to(candidate, self.types))?;
        let params = encode_ids(self.codec, source.output_params(candidate));
        let route = match plugin.routing() {
            RoutingStyle::Generic => Route::Render {
                plugin: plugin.name(),
            },
            RoutingStyle::LegacyBuiltin => Route::Legacy {
                plugin: plugin.name(),
            },
        };
        Some(LinkDescriptor {
            plugin: plugin.name().to_owned(),
            url: self.urls.build(route, &params),
            display_name: plugin.link_text().unwrap_or(plugin.name()).to_owned(),
            render_target: plugin.render_target(),
            embeddable: plugin.embeddable(),
        })
    }
}

/// Converts output attributes to text, encoding every identifier.
///
/// Attributes typed as identifiers are always encoded, as are unsigned
/// integers (or their decimal text) stored under `id` or a key ending in
/// `_id`.
#[must_use]
pub fn encode_ids(codec: &dyn IdCodec, params: BTreeMap<String, Attr>) -> BTreeMap<String, String> {
    params
        .into_iter()
        .map(|(key, attr)| {
            let text = match &attr {
                Attr::Id(id) => codec.encode(*id),
                other if is_id_key(&key) => match numeric_id(other) {
                    Some(id) => codec.encode(id),
                    None => other.text(),
                },
                other => other.text(),
            };
            (key, text)
        })
        .collect()
}

fn numeric_id(attr: &Attr) -> Option<u64> {
    match attr {
        Attr::Value(serde_json::Value::Number(number)) => number.as_u64(),
        Attr::Value(serde_json::Value::String(text)) => text.trim().parse().ok(),
        Attr::Id(_) | Attr::Value(_) | Attr::Object(_) => None,
    }
}

fn is_id_key(key: &str) -> bool {
    key == "id" || key.ends_with("_id")
}

#[cfg(test)]
mod tests;
