//! Plugin registry with filesystem discovery.
//!
//! A plugin lives at `<root>/<name>/config/<name>.json`. Discovery scans the
//! immediate children of each root, silently ignores anything without that
//! shape, and loads the rest. A plugin whose document fails to parse or
//! validate is logged and left out; it never stops its siblings from
//! loading. Duplicate names overwrite earlier entries.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{CONFIG_EXTENSION, parse_str};
use crate::descriptor::PluginDescriptor;
use crate::error::PluginError;

/// Name of the per-plugin configuration subdirectory.
pub const CONFIG_DIR: &str = "config";

/// A plugin directory that failed to load.
#[derive(Debug)]
pub struct DiscoveryFailure {
    /// Plugin directory.
    pub path: PathBuf,
    /// Why loading failed.
    pub error: PluginError,
}

/// Summary of one discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Names of plugins loaded, in discovery order.
    pub loaded: Vec<String>,
    /// Directories of plugins flagged as disabled.
    pub disabled: Vec<PathBuf>,
    /// Plugins excluded because their documents were invalid.
    pub failures: Vec<DiscoveryFailure>,
}

impl DiscoveryReport {
    /// Returns `true` when no plugin failed to load.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of loaded plugin descriptors keyed by name.
///
/// # Example
///
/// ```
/// use vista_plugins::{DataSource, ModelType, PluginDescriptor, PluginRegistry};
///
/// let mut registry = PluginRegistry::new();
/// let plugin = PluginDescriptor::new(
///     "table",
///     vec![DataSource::new(ModelType::HistoryDatasetAssociation)],
///     "table.html",
/// )
/// .expect("valid descriptor");
/// registry.register(plugin);
/// assert!(registry.get("table").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<PluginDescriptor>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by discovering plugins under the given roots.
    #[must_use]
    pub fn discovered<P: AsRef<Path>>(roots: &[P]) -> (Self, DiscoveryReport) {
        let mut registry = Self::new();
        let report = registry.discover(roots);
        (registry, report)
    }

    /// Registers a descriptor, replacing any plugin with the same name.
    pub fn register(&mut self, plugin: PluginDescriptor) {
        let name = plugin.name().to_owned();
        if self.plugins.insert(name.clone(), Arc::new(plugin)).is_some() {
            debug!(plugin = %name, "replacing previously discovered plugin");
        }
    }

    /// Scans each root for plugin directories and loads them.
    ///
    /// Never fails: unreadable roots and invalid plugins are logged and
    /// reported, and discovery carries on with the remainder.
    #[must_use = "the report lists plugins that failed to load"]
    pub fn discover<P: AsRef<Path>>(&mut self, roots: &[P]) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        for root in roots {
            let root = root.as_ref();
            for directory in candidate_directories(root) {
                match load_plugin(&directory) {
                    Ok(Some(plugin)) => {
                        report.loaded.push(plugin.name().to_owned());
                        self.register(plugin);
                    }
                    Ok(None) => {
                        info!(path = %directory.display(), "plugin is disabled");
                        report.disabled.push(directory);
                    }
                    Err(error) => {
                        warn!(path = %directory.display(), %error, "failed to load plugin");
                        report.failures.push(DiscoveryFailure {
                            path: directory,
                            error,
                        });
                    }
                }
            }
        }
        info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "plugin discovery complete"
        );
        report
    }

    /// Discards every loaded plugin and discovers again.
    #[must_use = "the report lists plugins that failed to load"]
    pub fn reload<P: AsRef<Path>>(&mut self, roots: &[P]) -> DiscoveryReport {
        self.plugins.clear();
        self.discover(roots)
    }

    /// Looks up a plugin by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(name).map(AsRef::as_ref)
    }

    /// Looks up a plugin that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] when no plugin has the name.
    pub fn require(&self, name: &str) -> Result<&PluginDescriptor, PluginError> {
        self.get(name).ok_or_else(|| PluginError::NotFound {
            name: name.to_owned(),
        })
    }

    /// Iterates every loaded plugin; order carries no meaning.
    pub fn all(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.values().map(AsRef::as_ref)
    }

    /// Returns the loaded plugin names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of loaded plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Loads the plugin in `directory`.
///
/// Returns `Ok(None)` for a disabled plugin.
///
/// # Errors
///
/// Returns [`PluginError::Io`] when the document cannot be read, or any
/// error raised while parsing it.
pub fn load_plugin(directory: &Path) -> Result<Option<PluginDescriptor>, PluginError> {
    let path = config_path(directory).ok_or_else(|| {
        PluginError::invalid(directory.display().to_string(), "directory name is not valid UTF-8")
    })?;
    let text = fs::read_to_string(&path).map_err(|source| PluginError::Io {
        path: path.clone(),
        source: Arc::new(source),
    })?;
    let plugin = parse_str(&text, &path)?;
    Ok(plugin.map(|plugin| plugin.with_path(directory.to_path_buf())))
}

fn config_path(directory: &Path) -> Option<PathBuf> {
    let name = directory.file_name()?.to_str()?;
    Some(
        directory
            .join(CONFIG_DIR)
            .join(format!("{name}.{CONFIG_EXTENSION}")),
    )
}

/// Returns `true` when `directory` has the shape of a plugin directory.
#[must_use]
pub fn is_candidate(directory: &Path) -> bool {
    directory.is_dir() && config_path(directory).is_some_and(|path| path.is_file())
}

fn candidate_directories(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(root = %root.display(), %error, "cannot read plugin root");
            return Vec::new();
        }
    };
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            let candidate = is_candidate(path);
            if !candidate {
                debug!(path = %path.display(), "not a plugin directory");
            }
            candidate
        })
        .collect();
    candidates.sort();
    candidates
}
