//! Plugin descriptor types.
//!
//! A [`PluginDescriptor`] declares everything the engine needs to know about
//! a renderer plugin: its name, the domain objects it can render, the
//! parameters it accepts, and how links to it are shaped. Descriptors are
//! built once at discovery time and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_source::DataSource;
use crate::error::PluginError;
use crate::param::{ParamModifiers, ParamSchema};

/// Frame a rendered plugin opens in.
///
/// # Example
///
/// ```
/// use vista_plugins::RenderTarget;
///
/// assert_eq!(RenderTarget::from_config(Some("blank")), RenderTarget::Blank);
/// assert_eq!(RenderTarget::from_config(Some("sideways")), RenderTarget::Primary);
/// assert_eq!(RenderTarget::default().as_str(), "primary");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    /// The application's main content frame.
    #[default]
    Primary,
    /// The full browser window.
    Top,
    /// A new browser window.
    Blank,
}

impl RenderTarget {
    /// Parses a configured target; invalid or missing values fall back to
    /// the default.
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("top") => Self::Top,
            Some("blank") => Self::Blank,
            _ => Self::Primary,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Top => "top",
            Self::Blank => "blank",
        }
    }
}

impl std::fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL shape used when linking to a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStyle {
    /// The shared render route, parameterised by plugin name.
    #[default]
    Generic,
    /// A built-in plugin with its own dedicated route.
    LegacyBuiltin,
}

/// Immutable description of one renderer plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    name: String,
    embeddable: bool,
    description: Option<String>,
    data_sources: Vec<DataSource>,
    params: ParamSchema,
    param_modifiers: ParamModifiers,
    template: String,
    link_text: Option<String>,
    render_target: RenderTarget,
    routing: RoutingStyle,
    path: Option<PathBuf>,
}

impl PluginDescriptor {
    /// Creates a descriptor with the mandatory fields.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ConfigValidation`] when the name or template is
    /// blank, or no data source is given.
    pub fn new(
        name: impl Into<String>,
        data_sources: Vec<DataSource>,
        template: impl Into<String>,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        let template = template.into();
        if name.trim().is_empty() {
            return Err(PluginError::invalid(name, "plugin name must not be empty"));
        }
        if data_sources.is_empty() {
            return Err(PluginError::invalid(name, "plugin declares no valid data sources"));
        }
        if template.trim().is_empty() {
            return Err(PluginError::invalid(name, "plugin template must not be empty"));
        }
        Ok(Self {
            name,
            embeddable: false,
            description: None,
            data_sources,
            params: ParamSchema::new(),
            param_modifiers: ParamModifiers::new(),
            template,
            link_text: None,
            render_target: RenderTarget::default(),
            routing: RoutingStyle::default(),
            path: None,
        })
    }

    /// Sets the parameter schema and its modifiers.
    #[must_use]
    pub fn with_params(mut self, params: ParamSchema, modifiers: ParamModifiers) -> Self {
        self.params = params;
        self.param_modifiers = modifiers;
        self
    }

    /// Marks the plugin as embeddable.
    #[must_use]
    pub const fn with_embeddable(mut self, embeddable: bool) -> Self {
        self.embeddable = embeddable;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the link text.
    #[must_use]
    pub fn with_link_text(mut self, link_text: Option<String>) -> Self {
        self.link_text = link_text;
        self
    }

    /// Sets the render target.
    #[must_use]
    pub const fn with_render_target(mut self, render_target: RenderTarget) -> Self {
        self.render_target = render_target;
        self
    }

    /// Sets the routing style.
    #[must_use]
    pub const fn with_routing(mut self, routing: RoutingStyle) -> Self {
        self.routing = routing;
        self
    }

    /// Records the directory the plugin was discovered in.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Returns the plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `true` when the plugin may be embedded.
    #[must_use]
    pub const fn embeddable(&self) -> bool {
        self.embeddable
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the data sources in declaration order; never empty.
    #[must_use]
    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    /// Returns the parameter schema.
    #[must_use]
    pub const fn params(&self) -> &ParamSchema {
        &self.params
    }

    /// Returns the parameter modifiers.
    #[must_use]
    pub const fn param_modifiers(&self) -> &ParamModifiers {
        &self.param_modifiers
    }

    /// Returns the template reference.
    #[must_use]
    pub const fn template(&self) -> &str {
        self.template.as_str()
    }

    /// Returns the link text.
    #[must_use]
    pub fn link_text(&self) -> Option<&str> {
        self.link_text.as_deref()
    }

    /// Returns the render target.
    #[must_use]
    pub const fn render_target(&self) -> RenderTarget {
        self.render_target
    }

    /// Returns the routing style.
    #[must_use]
    pub const fn routing(&self) -> RoutingStyle {
        self.routing
    }

    /// Returns the directory the plugin was discovered in.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests;
