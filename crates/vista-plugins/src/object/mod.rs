//! Field access over domain objects and plain records.
//!
//! Predicates and link parameters read attributes off whatever object the
//! host application hands in. Rather than inspecting runtime types, every
//! candidate implements [`DomainObject`], a single field-access capability
//! shared by real domain objects and by [`Record`], the plain structured
//! record used for nested values and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Domain type tags a data source may bind to.
///
/// The set is closed; extending it is a code change, not configuration.
///
/// # Example
///
/// ```
/// use vista_plugins::ModelType;
///
/// let tag: ModelType = "Visualization".parse().expect("known tag");
/// assert_eq!(tag.as_str(), "Visualization");
/// assert!("Workflow".parse::<ModelType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// A dataset living in a user history.
    HistoryDatasetAssociation,
    /// A dataset living in a shared data library.
    LibraryDatasetDatasetAssociation,
    /// A saved visualization.
    Visualization,
}

impl ModelType {
    /// Returns the canonical tag used in configuration documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HistoryDatasetAssociation => "HistoryDatasetAssociation",
            Self::LibraryDatasetDatasetAssociation => "LibraryDatasetDatasetAssociation",
            Self::Visualization => "Visualization",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a model class tag is outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported model class '{0}'")]
pub struct UnknownModelType(pub String);

impl FromStr for ModelType {
    type Err = UnknownModelType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "HistoryDatasetAssociation" => Ok(Self::HistoryDatasetAssociation),
            "LibraryDatasetDatasetAssociation" => Ok(Self::LibraryDatasetDatasetAssociation),
            "Visualization" => Ok(Self::Visualization),
            other => Err(UnknownModelType(other.to_owned())),
        }
    }
}

/// Handle to a type produced by a [`TypeRegistry`] lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a tag from its registry name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Late-bound lookup of the types `isinstance` predicates test against.
///
/// The registry is consulted at evaluation time, never at parse time, so a
/// plugin can name types that are only registered after discovery.
pub trait TypeRegistry {
    /// Resolves a configured type name, or `None` when it is unknown.
    fn lookup(&self, name: &str) -> Option<TypeTag>;
}

/// Registry that knows no types; every `isinstance` test is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTypes;

impl TypeRegistry for NoTypes {
    fn lookup(&self, _name: &str) -> Option<TypeTag> {
        None
    }
}

/// Registry backed by a fixed set of names.
#[derive(Debug, Default, Clone)]
pub struct StaticTypes {
    names: BTreeSet<String>,
}

impl StaticTypes {
    /// Builds a registry from the given type names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeRegistry for StaticTypes {
    fn lookup(&self, name: &str) -> Option<TypeTag> {
        self.names.contains(name).then(|| TypeTag::new(name))
    }
}

/// Uniform field access implemented by anything a plugin may be asked about.
pub trait DomainObject: fmt::Debug + Send + Sync {
    /// Returns the model type tag when the object is a bindable domain type.
    fn model_type(&self) -> Option<ModelType> {
        None
    }

    /// Reads a named member.
    fn field(&self, name: &str) -> Option<Attr>;

    /// Reports whether a named member exists.
    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Checks for a named data provider.
    ///
    /// `None` means the object does not expose data providers at all.
    fn has_dataprovider(&self, _name: &str) -> Option<bool> {
        None
    }

    /// Reports whether the object is an instance of the given type.
    fn is_instance_of(&self, _ty: &TypeTag) -> bool {
        false
    }

    /// Text form used by equality predicates.
    fn text(&self) -> String;
}

/// Value produced by reading a member off a [`DomainObject`].
#[derive(Debug, Clone)]
pub enum Attr {
    /// A numeric primary key; always encoded before leaving the process.
    Id(u64),
    /// Plain structured data.
    Value(serde_json::Value),
    /// A nested object with its own members.
    Object(Arc<dyn DomainObject>),
}

impl Attr {
    /// Reads a member of this attribute, walking JSON objects by key.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Self> {
        match self {
            Self::Object(object) => object.field(name),
            Self::Value(serde_json::Value::Object(map)) => map.get(name).cloned().map(Self::Value),
            Self::Id(_) | Self::Value(_) => None,
        }
    }

    /// Returns the nested object, if this attribute is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&dyn DomainObject> {
        match self {
            Self::Object(object) => Some(object.as_ref()),
            Self::Id(_) | Self::Value(_) => None,
        }
    }

    /// Text form used by equality predicates and link parameters.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Value(value) => value_text(value),
            Self::Object(object) => object.text(),
        }
    }
}

pub(crate) fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Plain structured record implementing [`DomainObject`].
///
/// # Example
///
/// ```
/// use vista_plugins::{Attr, DomainObject, ModelType, Record};
///
/// let hda = Record::new("dataset 1")
///     .with_model_type(ModelType::HistoryDatasetAssociation)
///     .with_field("id", Attr::Id(7))
///     .with_value("name", "reads.bam");
///
/// assert_eq!(hda.model_type(), Some(ModelType::HistoryDatasetAssociation));
/// assert_eq!(hda.field("name").map(|attr| attr.text()).as_deref(), Some("reads.bam"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    text: String,
    model_type: Option<ModelType>,
    types: BTreeSet<String>,
    fields: BTreeMap<String, Attr>,
    data_providers: Option<BTreeSet<String>>,
}

impl Record {
    /// Creates an empty record with the given text form.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the model type tag.
    #[must_use]
    pub const fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    /// Declares a type this record is an instance of.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.types.insert(name.into());
        self
    }

    /// Adds a member.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, attr: Attr) -> Self {
        self.fields.insert(name.into(), attr);
        self
    }

    /// Adds a plain-data member.
    #[must_use]
    pub fn with_value(self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.with_field(name, Attr::Value(value.into()))
    }

    /// Adds a nested record.
    #[must_use]
    pub fn with_object(self, name: impl Into<String>, object: Self) -> Self {
        self.with_field(name, Attr::Object(Arc::new(object)))
    }

    /// Declares a named data provider, enabling the capability.
    #[must_use]
    pub fn with_dataprovider(mut self, name: impl Into<String>) -> Self {
        self.data_providers
            .get_or_insert_with(BTreeSet::new)
            .insert(name.into());
        self
    }
}

impl DomainObject for Record {
    fn model_type(&self) -> Option<ModelType> {
        self.model_type
    }

    fn field(&self, name: &str) -> Option<Attr> {
        self.fields.get(name).cloned()
    }

    fn has_dataprovider(&self, name: &str) -> Option<bool> {
        self.data_providers
            .as_ref()
            .map(|providers| providers.contains(name))
    }

    fn is_instance_of(&self, ty: &TypeTag) -> bool {
        self.types.contains(ty.name())
    }

    fn text(&self) -> String {
        self.text.clone()
    }
}
