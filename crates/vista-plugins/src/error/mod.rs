//! Domain errors raised by plugin discovery and resource resolution.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.
//!
//! Two families exist. [`PluginError`] covers everything that can go wrong
//! while turning configuration documents into descriptors; discovery catches
//! these per plugin. [`ResolveError`] covers request-time failures and is
//! surfaced to whoever asked for resolution.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::param::{PrimitiveType, ResourceKind};

/// Errors arising while loading or looking up plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The requested plugin was not found in the registry.
    #[error("plugin '{name}' not found in registry")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// A configuration document is structurally invalid.
    #[error("invalid configuration for plugin '{plugin}': {message}")]
    ConfigValidation {
        /// Plugin name, or the directory name when the name itself is absent.
        plugin: String,
        /// Description of the validation failure.
        message: String,
    },

    /// A configuration document could not be parsed as JSON.
    #[error("failed to parse plugin configuration '{}': {source}", path.display())]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// Reading a configuration document failed.
    #[error("I/O error reading plugin configuration '{}': {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl PluginError {
    /// Builds a [`PluginError::ConfigValidation`] for the named plugin.
    #[must_use]
    pub fn invalid(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

/// Errors reported by the domain-object resolver collaborator.
///
/// A failed lookup of a request-supplied identifier leaves the parameter
/// absent. A failed lookup of a configured default is handed back to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No object of the requested kind exists for the identifier.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Kind that was requested.
        kind: ResourceKind,
        /// Identifier as supplied by the request.
        id: String,
    },

    /// The object exists but the current requester may not see it.
    #[error("{kind} '{id}' is not accessible")]
    NotAccessible {
        /// Kind that was requested.
        kind: ResourceKind,
        /// Identifier as supplied by the request.
        id: String,
    },

    /// Any other collaborator failure.
    #[error("domain lookup failed: {message}")]
    Other {
        /// Human-readable failure description.
        message: String,
    },
}

/// Errors arising while resolving a request into typed resources.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required parameter had no usable value.
    #[error("missing required parameter '{key}'")]
    MissingRequiredParameter {
        /// Declared parameter key.
        key: String,
    },

    /// A raw value could not be coerced to the declared primitive type.
    #[error("parameter '{key}' value '{value}' is not a valid {expected}: {message}")]
    Coercion {
        /// Declared parameter key.
        key: String,
        /// Raw value that failed coercion.
        value: String,
        /// Type the value was coerced towards.
        expected: PrimitiveType,
        /// Description of the coercion failure.
        message: String,
    },

    /// A resource kind that depends on a modifier was resolved without it.
    #[error("parameter '{param}' requires modifier '{modifier}'")]
    MissingModifier {
        /// Parameter whose resolution needed the modifier.
        param: String,
        /// Modifier key that was absent.
        modifier: String,
    },

    /// The domain-object resolver rejected the lookup.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Error returned when an opaque identifier cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode identifier '{encoded}': {message}")]
pub struct CodecError {
    /// Encoded text that was rejected.
    pub encoded: String,
    /// Description of the failure.
    pub message: String,
}
