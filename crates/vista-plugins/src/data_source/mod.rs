//! Data-source descriptors binding a plugin to one kind of domain object.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::{RawDataSource, RawTest, RawToParam, text};
use crate::error::PluginError;
use crate::object::{Attr, DomainObject, ModelType, TypeRegistry};
use crate::predicate::{AttributePath, ExpectedKind, Predicate, PredicateKind, any_passes};

/// How one output query parameter obtains its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToParamRule {
    /// A literal value.
    Assign(String),
    /// A member read off the candidate object.
    ParamAttr(String),
}

impl ToParamRule {
    /// Evaluates the rule against a candidate; absent members yield `None`.
    #[must_use]
    pub fn evaluate(&self, candidate: &dyn DomainObject) -> Option<Attr> {
        match self {
            Self::Assign(literal) => Some(Attr::Value(serde_json::Value::String(literal.clone()))),
            Self::ParamAttr(name) => candidate.field(name),
        }
    }
}

/// One acceptable input type for a plugin, with its predicates and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSource {
    model_type: ModelType,
    tests: Vec<Predicate>,
    to_params: BTreeMap<String, ToParamRule>,
}

impl DataSource {
    /// Creates a data source with no predicates and no output params.
    #[must_use]
    pub const fn new(model_type: ModelType) -> Self {
        Self {
            model_type,
            tests: Vec::new(),
            to_params: BTreeMap::new(),
        }
    }

    /// Appends a predicate.
    #[must_use]
    pub fn with_test(mut self, predicate: Predicate) -> Self {
        self.tests.push(predicate);
        self
    }

    /// Adds an output query-parameter rule.
    #[must_use]
    pub fn with_to_param(mut self, key: impl Into<String>, rule: ToParamRule) -> Self {
        self.to_params.insert(key.into(), rule);
        self
    }

    /// Returns the bound model type.
    #[must_use]
    pub const fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// Returns the predicates in declaration order.
    #[must_use]
    pub fn tests(&self) -> &[Predicate] {
        &self.tests
    }

    /// Returns the output query-parameter rules.
    #[must_use]
    pub const fn to_params(&self) -> &BTreeMap<String, ToParamRule> {
        &self.to_params
    }

    /// Returns `true` when the candidate's type matches and any test passes.
    #[must_use]
    pub fn applies_to(&self, candidate: &dyn DomainObject, types: &dyn TypeRegistry) -> bool {
        candidate.model_type() == Some(self.model_type) && any_passes(&self.tests, candidate, types)
    }

    /// Evaluates every output rule, omitting members the candidate lacks.
    #[must_use]
    pub fn output_params(&self, candidate: &dyn DomainObject) -> BTreeMap<String, Attr> {
        self.to_params
            .iter()
            .filter_map(|(key, rule)| rule.evaluate(candidate).map(|attr| (key.clone(), attr)))
            .collect()
    }
}

/// Parses a `data_source` element.
///
/// # Errors
///
/// Returns [`PluginError::ConfigValidation`] when `model_class` is missing
/// or outside the allow-list, or a `to_param` element is malformed.
pub fn parse_data_source(plugin: &str, raw: &RawDataSource) -> Result<DataSource, PluginError> {
    let class = raw
        .model_class
        .as_deref()
        .ok_or_else(|| PluginError::invalid(plugin, "data_source has no model_class"))?;
    let model_type = class
        .parse::<ModelType>()
        .map_err(|error| PluginError::invalid(plugin, error.to_string()))?;
    let tests = raw.tests.iter().map(parse_test).collect();
    let to_params = raw
        .to_params
        .iter()
        .map(|to_param| parse_to_param(plugin, to_param))
        .collect::<Result<_, _>>()?;
    Ok(DataSource {
        model_type,
        tests,
        to_params,
    })
}

fn parse_test(raw: &RawTest) -> Predicate {
    Predicate::new(
        PredicateKind::from_config(raw.kind.as_deref()),
        AttributePath::parse(raw.test_attr.as_deref().unwrap_or_default()),
        text(raw.value.as_ref()).unwrap_or_default(),
        ExpectedKind::from_config(raw.result_type.as_deref()),
    )
}

fn parse_to_param(plugin: &str, raw: &RawToParam) -> Result<(String, ToParamRule), PluginError> {
    let key = raw
        .param
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| PluginError::invalid(plugin, "to_param element has no param key"))?;
    let rule = match (text(raw.assign.as_ref()), raw.param_attr.as_deref()) {
        (Some(literal), None) => ToParamRule::Assign(literal),
        (None, Some(attr)) => ToParamRule::ParamAttr(attr.trim().to_owned()),
        (Some(_), Some(_)) => {
            return Err(PluginError::invalid(
                plugin,
                format!("to_param '{key}' sets both assign and param_attr"),
            ));
        }
        (None, None) => {
            return Err(PluginError::invalid(
                plugin,
                format!("to_param '{key}' needs assign or param_attr"),
            ));
        }
    };
    Ok((key.to_owned(), rule))
}

#[cfg(test)]
mod tests;
