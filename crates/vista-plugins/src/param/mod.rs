//! Parameter descriptors and the param/modifier parser.
//!
//! A [`ParamDescriptor`] is the declarative shape of one value a plugin
//! accepts from a request. Defaults are kept as raw text and are only
//! coerced at resolution time, so query-supplied and default values share a
//! single coercion path.
//!
//! Modifiers are parameters that steer how another parameter is read. They
//! live in [`ParamModifiers`], keyed first by target and then by modifier
//! key. A modifier is itself a plain [`ParamDescriptor`], which carries no
//! modifiers of its own, so nesting stops at one level.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::document::{RawParam, flag, text};
use crate::error::PluginError;

/// Modifier consulted by [`ResourceKind::DatasetByRoleHint`].
pub const ROLE_HINT_MODIFIER: &str = "hda_ldda";

/// Value types coerced locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// Sanitised text.
    String,
    /// Boolean parsed from common truthy spellings.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Arbitrary JSON with sanitised string leaves.
    Json,
}

impl PrimitiveType {
    /// Returns the canonical configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value types resolved by the domain-object resolver collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A saved visualization.
    Visualization,
    /// A history dataset.
    Dataset,
    /// A history or library dataset, selected by the role-hint modifier.
    DatasetByRoleHint,
    /// A genome build key.
    BuildKey,
}

impl ResourceKind {
    /// Returns the canonical configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visualization => "visualization",
            Self::Dataset => "dataset",
            Self::DatasetByRoleHint => "hda_or_ldda",
            Self::BuildKey => "dbkey",
        }
    }

    /// Returns the modifier this kind cannot be resolved without.
    #[must_use]
    pub const fn required_modifier(self) -> Option<&'static str> {
        match self {
            Self::DatasetByRoleHint => Some(ROLE_HINT_MODIFIER),
            Self::Visualization | Self::Dataset | Self::BuildKey => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ValueType {
    /// Coerced locally.
    Primitive(PrimitiveType),
    /// Looked up through the domain-object resolver.
    Resource(ResourceKind),
}

impl ValueType {
    /// Parses a configured type name. Absence means `str`.
    ///
    /// # Errors
    ///
    /// Returns the unrecognised name.
    pub fn from_config(name: Option<&str>) -> Result<Self, String> {
        let Some(name) = name.map(str::trim) else {
            return Ok(Self::Primitive(PrimitiveType::String));
        };
        let parsed = match name {
            "" | "str" | "string" => Self::Primitive(PrimitiveType::String),
            "bool" => Self::Primitive(PrimitiveType::Bool),
            "int" => Self::Primitive(PrimitiveType::Int),
            "float" => Self::Primitive(PrimitiveType::Float),
            "json" => Self::Primitive(PrimitiveType::Json),
            "visualization" => Self::Resource(ResourceKind::Visualization),
            "dataset" => Self::Resource(ResourceKind::Dataset),
            "hda_or_ldda" => Self::Resource(ResourceKind::DatasetByRoleHint),
            "dbkey" => Self::Resource(ResourceKind::BuildKey),
            other => return Err(other.to_owned()),
        };
        Ok(parsed)
    }

    /// Returns `true` for locally coerced types.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

impl Default for ValueType {
    fn default() -> Self {
        Self::Primitive(PrimitiveType::String)
    }
}

/// Declarative shape of one resolvable value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParamDescriptor {
    value_type: ValueType,
    required: bool,
    default: Option<String>,
    constrain_to: Option<Vec<String>>,
    is_list: bool,
    rename_to: Option<String>,
}

impl ParamDescriptor {
    /// Creates an optional descriptor with no default.
    #[must_use]
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            ..Self::default()
        }
    }

    /// Marks the parameter as required, discarding any default.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = None;
        self
    }

    /// Sets the raw default text; ignored for required parameters.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        if !self.required {
            self.default = Some(default.into());
        }
        self
    }

    /// Enables comma-separated list semantics.
    #[must_use]
    pub const fn csv(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Stores the resolved value under a different key.
    #[must_use]
    pub fn renamed(mut self, key: impl Into<String>) -> Self {
        self.rename_to = Some(key.into());
        self
    }

    /// Restricts the advisory set of allowed literals.
    #[must_use]
    pub fn constrained_to(mut self, values: Vec<String>) -> Self {
        self.constrain_to = Some(values);
        self
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns `true` when a value must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the raw default text.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the advisory set of allowed literals.
    #[must_use]
    pub fn constrain_to(&self) -> Option<&[String]> {
        self.constrain_to.as_deref()
    }

    /// Returns `true` for comma-separated list parameters.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.is_list
    }

    /// Returns the rename target.
    #[must_use]
    pub fn rename_to(&self) -> Option<&str> {
        self.rename_to.as_deref()
    }

    /// Key the resolved value is stored under.
    #[must_use]
    pub fn output_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.rename_to.as_deref().unwrap_or(key)
    }
}

/// Parameter schema keyed by declared (not renamed) key.
pub type ParamSchema = BTreeMap<String, ParamDescriptor>;

/// Modifiers attached to one target parameter, keyed by modifier key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ModifierSet(BTreeMap<String, ParamDescriptor>);

impl ModifierSet {
    /// Returns the modifier descriptor for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamDescriptor> {
        self.0.get(key)
    }

    /// Iterates modifiers in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDescriptor)> {
        self.0.iter().map(|(key, descriptor)| (key.as_str(), descriptor))
    }

    /// Returns the number of modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no modifiers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Two-level modifier map: target param key, then modifier key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParamModifiers(BTreeMap<String, ModifierSet>);

impl ParamModifiers {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a modifier to a target parameter, replacing any earlier one.
    pub fn insert(
        &mut self,
        target: impl Into<String>,
        key: impl Into<String>,
        descriptor: ParamDescriptor,
    ) {
        self.0
            .entry(target.into())
            .or_default()
            .0
            .insert(key.into(), descriptor);
    }

    /// Returns the modifiers of a target parameter.
    #[must_use]
    pub fn for_param(&self, target: &str) -> Option<&ModifierSet> {
        self.0.get(target)
    }

    /// Returns `true` when no parameter has modifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses a `param` element into its key and descriptor.
///
/// # Errors
///
/// Returns [`PluginError::ConfigValidation`] when the key is missing or the
/// type name is not recognised.
pub fn parse_param(plugin: &str, raw: &RawParam) -> Result<(String, ParamDescriptor), PluginError> {
    let key = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PluginError::invalid(plugin, "param element has no name"))?;
    let value_type = ValueType::from_config(raw.kind.as_deref()).map_err(|unknown| {
        PluginError::invalid(plugin, format!("param '{key}' has unknown type '{unknown}'"))
    })?;
    let mut descriptor = ParamDescriptor::new(value_type);
    if flag(raw.required.as_ref()) {
        descriptor = descriptor.required();
    } else if let Some(default) = text(raw.default.as_ref()) {
        descriptor = descriptor.with_default(default);
    }
    if flag(raw.csv.as_ref()) {
        descriptor = descriptor.csv();
    }
    if let Some(constraint) = raw.constrain_to.as_deref() {
        descriptor = descriptor
            .constrained_to(constraint.split(',').map(|v| v.trim().to_owned()).collect());
    }
    if let Some(rename) = raw
        .var_name_in_template
        .as_deref()
        .map(str::trim)
        .filter(|rename| !rename.is_empty())
    {
        descriptor = descriptor.renamed(rename);
    }
    Ok((key.to_owned(), descriptor))
}

/// Parses a `param_modifier` element into its target, key and descriptor.
///
/// # Errors
///
/// Returns [`PluginError::ConfigValidation`] for the same reasons as
/// [`parse_param`], or when `modifies` is absent.
pub fn parse_modifier(
    plugin: &str,
    raw: &RawParam,
) -> Result<(String, String, ParamDescriptor), PluginError> {
    let (key, descriptor) = parse_param(plugin, raw)?;
    let target = raw
        .modifies
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or_else(|| {
            PluginError::invalid(plugin, format!("param_modifier '{key}' has no 'modifies' target"))
        })?;
    Ok((target.to_owned(), key, descriptor))
}

/// Parses the `params` block into a schema and its modifiers.
///
/// Modifiers are matched against the already-parsed params; a modifier whose
/// target is not declared is dropped.
///
/// # Errors
///
/// Returns the first [`PluginError`] raised by an element.
pub fn parse_params(
    plugin: &str,
    params: &[RawParam],
    modifiers: &[RawParam],
) -> Result<(ParamSchema, ParamModifiers), PluginError> {
    let schema = params
        .iter()
        .map(|raw| parse_param(plugin, raw))
        .collect::<Result<ParamSchema, _>>()?;
    let mut parsed_modifiers = ParamModifiers::new();
    for raw in modifiers {
        let (target, key, descriptor) = parse_modifier(plugin, raw)?;
        if !schema.contains_key(&target) {
            debug!(plugin, modifier = %key, target = %target, "dropping modifier for undeclared param");
            continue;
        }
        parsed_modifiers.insert(target, key, descriptor);
    }
    Ok((schema, parsed_modifiers))
}

#[cfg(test)]
mod tests;
