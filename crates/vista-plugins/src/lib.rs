//! Declarative renderer plugins and request resource resolution for Vista.
//!
//! The `vista-plugins` crate discovers optional renderer plugins on disk,
//! decides which plugins can render a given domain object, synthesises the
//! links that invoke them, and, at render time, turns a request's flat
//! key/value map into typed, validated resources according to each plugin's
//! declarative parameter schema.
//!
//! # Architecture
//!
//! Plugins are described by JSON documents at
//! `<root>/<name>/config/<name>.json`. The [`PluginRegistry`] discovers and
//! parses them into immutable [`PluginDescriptor`]s; a malformed plugin is
//! logged and skipped without affecting the others. The [`LinkBuilder`]
//! evaluates each plugin's [`DataSource`]s and [`predicate`]s against a
//! candidate object, and the [`ResourceResolver`] resolves request
//! parameters, delegating domain lookups to a [`DomainResolver`]
//! collaborator supplied by the host application.
//!
//! # Example
//!
//! ```rust,no_run
//! use vista_plugins::{PluginRegistry, RequestQuery, ResourceResolver};
//! # use std::sync::Arc;
//! # use vista_plugins::{DomainError, DomainObject, DomainResolver, ResourceKind, ResourceMap};
//! # struct Db;
//! # impl DomainResolver for Db {
//! #     fn resolve(&self, kind: ResourceKind, id: &str, _: &ResourceMap)
//! #         -> Result<Arc<dyn DomainObject>, DomainError> {
//! #         Err(DomainError::NotFound { kind, id: id.to_owned() })
//! #     }
//! # }
//!
//! let (registry, report) = PluginRegistry::discovered(&["config/plugins/visualizations"]);
//! assert!(report.is_clean());
//!
//! let plugin = registry.require("scatterplot").expect("plugin is installed");
//! let query = RequestQuery::parse("dataset_id=f2db41e1fa331b3e&columns=1,2");
//! let resources = ResourceResolver::new(&Db)
//!     .resolve_all(plugin.params(), plugin.param_modifiers(), &query);
//! ```

pub mod config;
pub mod data_source;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod links;
pub mod object;
pub mod param;
pub mod predicate;
pub mod registry;
pub mod resolver;
pub mod sanitize;

#[cfg(test)]
mod tests;

pub use self::data_source::{DataSource, ToParamRule};
pub use self::descriptor::{PluginDescriptor, RenderTarget, RoutingStyle};
pub use self::error::{CodecError, DomainError, PluginError, ResolveError};
pub use self::links::{IdCodec, LinkBuilder, LinkDescriptor, PathUrlBuilder, UrlBuilder};
pub use self::object::{
    Attr, DomainObject, ModelType, NoTypes, Record, StaticTypes, TypeRegistry, TypeTag,
};
pub use self::param::{ParamDescriptor, ParamModifiers, ParamSchema, PrimitiveType, ResourceKind, ValueType};
pub use self::registry::{DiscoveryReport, PluginRegistry};
pub use self::resolver::{
    DomainResolver, QueryValue, RequestQuery, ResolvedValue, ResourceMap, ResourceResolver,
};
