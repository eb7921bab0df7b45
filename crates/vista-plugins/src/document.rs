//! Raw configuration document shapes.
//!
//! These types mirror the on-disk JSON one-to-one and carry no validation;
//! the typed descriptors are built from them by the parsers in
//! [`crate::config`], [`crate::data_source`] and [`crate::param`].
//! Attributes accept strings, booleans or numbers so hand-written documents
//! can use whichever spelling is natural.

use serde::Deserialize;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Textual value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(serde_json::Number),
}

impl Scalar {
    /// Returns the text form of the value.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Bool(flag) => flag.to_string(),
            Self::Number(number) => number.to_string(),
        }
    }

    /// Returns `true` only for the literal `"true"` or boolean `true`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true)) || matches!(self, Self::Text(text) if text == "true")
    }
}

pub(crate) fn flag(value: Option<&Scalar>) -> bool {
    value.is_some_and(Scalar::is_true)
}

pub(crate) fn text(value: Option<&Scalar>) -> Option<String> {
    value.map(Scalar::text)
}

/// Root element of a plugin configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPluginDocument {
    /// Unique plugin name.
    pub name: Option<String>,
    /// Retires the plugin without deleting it.
    pub disabled: Option<Scalar>,
    /// Whether the plugin may be embedded in another page.
    pub embeddable: Option<Scalar>,
    /// Selects the legacy built-in routing style.
    pub legacy_route: Option<Scalar>,
    /// Free-text description.
    pub description: Option<String>,
    /// Data-source elements.
    pub data_sources: Option<Vec<RawDataSource>>,
    /// Parameter block.
    pub params: Option<RawParams>,
    /// Template reference.
    pub template: Option<String>,
    /// Link text shown to users.
    pub link_text: Option<String>,
    /// Frame the rendered output targets.
    pub render_target: Option<String>,
}

/// A `data_source` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDataSource {
    /// Domain type tag.
    pub model_class: Option<String>,
    /// Predicate elements.
    #[serde(default)]
    pub tests: Vec<RawTest>,
    /// Output query-parameter rules.
    #[serde(default)]
    pub to_params: Vec<RawToParam>,
}

/// A `test` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTest {
    /// Test kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Dotted attribute path.
    pub test_attr: Option<String>,
    /// How `value` is interpreted.
    pub result_type: Option<String>,
    /// Expected value.
    pub value: Option<Scalar>,
}

/// A `to_param` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawToParam {
    /// Output query key.
    pub param: Option<String>,
    /// Literal value.
    pub assign: Option<Scalar>,
    /// Attribute read off the candidate.
    pub param_attr: Option<String>,
}

/// The `params` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParams {
    /// `param` elements.
    #[serde(default)]
    pub param: Vec<RawParam>,
    /// `param_modifier` elements.
    #[serde(default)]
    pub param_modifier: Vec<RawParam>,
}

/// A `param` or `param_modifier` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParam {
    /// External key.
    pub name: Option<String>,
    /// Value type name.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Whether a value must be supplied.
    pub required: Option<Scalar>,
    /// Raw default text.
    pub default: Option<Scalar>,
    /// Comma-separated allowed literals.
    pub constrain_to: Option<String>,
    /// Comma-separated list semantics.
    pub csv: Option<Scalar>,
    /// Rename target.
    pub var_name_in_template: Option<String>,
    /// Target param key; modifiers only.
    pub modifies: Option<String>,
}
