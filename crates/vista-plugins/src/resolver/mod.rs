//! Request-time resource resolution.
//!
//! The [`ResourceResolver`] turns a flat request map into a
//! [`ResourceMap`] according to a plugin's parameter schema. Primitive
//! types are coerced locally; resource kinds are handed to the
//! [`DomainResolver`] collaborator.
//!
//! For each key, modifiers are resolved first, then the query value, then
//! the default. A query value that fails coercion or domain lookup degrades
//! to "absent" instead of failing the request; a missing required value
//! fails it. Lookups of configured defaults pass collaborator errors
//! through unchanged.

mod coerce;
mod query;
mod value;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{DomainError, ResolveError};
use crate::object::DomainObject;
use crate::param::{ModifierSet, ParamDescriptor, ParamModifiers, ParamSchema, ResourceKind, ValueType};
use crate::sanitize::sanitize_html;

pub use self::query::{QueryValue, RequestQuery};
pub use self::value::{ResolvedValue, ResourceMap};

/// Collaborator that turns an identifier into an access-checked object.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vista_plugins::{DomainError, DomainObject, DomainResolver, Record, ResourceKind, ResourceMap};
///
/// struct Fixed;
///
/// impl DomainResolver for Fixed {
///     fn resolve(
///         &self,
///         kind: ResourceKind,
///         id: &str,
///         _modifiers: &ResourceMap,
///     ) -> Result<Arc<dyn DomainObject>, DomainError> {
///         match id {
///             "f2db41e1fa331b3e" => Ok(Arc::new(Record::new("reads.bam"))),
///             _ => Err(DomainError::NotFound { kind, id: id.to_owned() }),
///         }
///     }
/// }
/// ```
pub trait DomainResolver {
    /// Resolves `id` as an object of `kind`.
    ///
    /// `modifiers` holds the already-resolved modifiers of the parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when the object is missing or hidden.
    fn resolve(
        &self,
        kind: ResourceKind,
        id: &str,
        modifiers: &ResourceMap,
    ) -> Result<Arc<dyn DomainObject>, DomainError>;
}

/// Which descriptors a resolution pass considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    PrimitiveOnly,
}

/// Resolves request maps against parameter schemas.
pub struct ResourceResolver<'a> {
    domain: &'a dyn DomainResolver,
}

impl<'a> ResourceResolver<'a> {
    /// Creates a resolver backed by the given collaborator.
    #[must_use]
    pub const fn new(domain: &'a dyn DomainResolver) -> Self {
        Self { domain }
    }

    /// Resolves every parameter of a schema.
    ///
    /// Optional parameters always get an entry, [`ResolvedValue::Null`]
    /// when no default is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingRequiredParameter`] when a required
    /// key has no usable value, [`ResolveError::MissingModifier`] for a
    /// role-hinted dataset without its modifier, and domain-resolver errors
    /// raised while resolving a configured default.
    pub fn resolve_all(
        &self,
        schema: &ParamSchema,
        modifiers: &ParamModifiers,
        query: &RequestQuery,
    ) -> Result<ResourceMap, ResolveError> {
        self.resolve_schema(schema, modifiers, query, Scope::All)
    }

    /// Resolves only the primitive parameters of a schema.
    ///
    /// Resource-kind parameters are dropped without consulting the
    /// collaborator, so the result is always JSON-serialisable.
    ///
    /// # Errors
    ///
    /// As for [`ResourceResolver::resolve_all`].
    pub fn resolve_config_subset(
        &self,
        schema: &ParamSchema,
        modifiers: &ParamModifiers,
        query: &RequestQuery,
    ) -> Result<ResourceMap, ResolveError> {
        self.resolve_schema(schema, modifiers, query, Scope::PrimitiveOnly)
    }

    fn resolve_schema(
        &self,
        schema: &ParamSchema,
        modifiers: &ParamModifiers,
        query: &RequestQuery,
        scope: Scope,
    ) -> Result<ResourceMap, ResolveError> {
        let mut resolved = ResourceMap::new();
        for (key, descriptor) in schema {
            if scope == Scope::PrimitiveOnly && !descriptor.value_type().is_primitive() {
                debug!(key = %key, "dropping resource parameter from config subset");
                continue;
            }
            let context = match modifiers.for_param(key) {
                Some(set) => self.resolve_modifiers(set, query)?,
                None => ResourceMap::new(),
            };
            let value = self.resolve_entry(key, descriptor, query, &context)?;
            resolved.insert(descriptor.output_key(key), value);
        }
        Ok(resolved)
    }

    fn resolve_modifiers(
        &self,
        set: &ModifierSet,
        query: &RequestQuery,
    ) -> Result<ResourceMap, ResolveError> {
        let empty = ResourceMap::new();
        let mut resolved = ResourceMap::new();
        for (key, descriptor) in set.iter() {
            let value = self.resolve_entry(key, descriptor, query, &empty)?;
            resolved.insert(descriptor.output_key(key), value);
        }
        Ok(resolved)
    }

    fn resolve_entry(
        &self,
        key: &str,
        descriptor: &ParamDescriptor,
        query: &RequestQuery,
        modifiers: &ResourceMap,
    ) -> Result<ResolvedValue, ResolveError> {
        let supplied = match query.get(key) {
            Some(raw) => match self.resolve_one(key, descriptor, raw, modifiers) {
                Ok(value) => Some(value),
                Err(error @ ResolveError::MissingModifier { .. }) => return Err(error),
                Err(error) => {
                    warn!(key, %error, "ignoring unusable parameter value");
                    None
                }
            },
            None => None,
        };
        if let Some(value) = supplied {
            return Ok(value);
        }
        if descriptor.is_required() {
            return Err(ResolveError::MissingRequiredParameter {
                key: key.to_owned(),
            });
        }
        match descriptor.default_value() {
            Some(default) => self.resolve_one(
                key,
                descriptor,
                &QueryValue::Single(default.to_owned()),
                modifiers,
            ),
            None => Ok(ResolvedValue::Null),
        }
    }

    /// Resolves one raw value against a descriptor.
    ///
    /// List parameters split the value and resolve each item.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Coercion`] for malformed primitives,
    /// [`ResolveError::MissingModifier`] when a role-hinted dataset lacks its
    /// modifier, and domain-resolver errors unchanged.
    pub fn resolve_one(
        &self,
        key: &str,
        descriptor: &ParamDescriptor,
        raw: &QueryValue,
        modifiers: &ResourceMap,
    ) -> Result<ResolvedValue, ResolveError> {
        if descriptor.is_list() {
            return raw
                .list_items()
                .into_iter()
                .map(|item| self.resolve_scalar(key, descriptor.value_type(), item, modifiers))
                .collect::<Result<Vec<_>, _>>()
                .map(ResolvedValue::List);
        }
        let item = raw.scalar().unwrap_or_default();
        self.resolve_scalar(key, descriptor.value_type(), item, modifiers)
    }

    fn resolve_scalar(
        &self,
        key: &str,
        value_type: ValueType,
        raw: &str,
        modifiers: &ResourceMap,
    ) -> Result<ResolvedValue, ResolveError> {
        match value_type {
            ValueType::Primitive(primitive) => coerce::coerce(key, primitive, raw),
            ValueType::Resource(kind) => {
                if let Some(modifier) = kind.required_modifier() {
                    let present = modifiers
                        .get(modifier)
                        .is_some_and(|value| !value.is_null());
                    if !present {
                        return Err(ResolveError::MissingModifier {
                            param: key.to_owned(),
                            modifier: modifier.to_owned(),
                        });
                    }
                }
                let id = sanitize_html(raw.trim());
                let object = self.domain.resolve(kind, &id, modifiers)?;
                Ok(ResolvedValue::Object(object))
            }
        }
    }
}
