//! Report plugins
//!
//! Plugins see every converted test case. `prepare` may enrich a test case
//! before it is written; `process` lets a plugin accumulate its own view of
//! the run, which it hands back as one or more JSON data files.
//!
//! Plugins are not discovered by reflection: a [`PluginRegistry`] lists the
//! available plugin factories by name and a [`PluginLoader`] decides which
//! of them to instantiate.

use crate::report::model::AllureTestCase;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

pub mod defects;
pub mod summary;
pub mod xunit;

pub use defects::DefectsPlugin;
pub use summary::SummaryPlugin;
pub use xunit::XUnitPlugin;

/// A data file produced by a plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginData {
    /// File name inside the report data directory
    pub name: String,
    pub data: serde_json::Value,
}

impl PluginData {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        PluginData {
            name: name.into(),
            data,
        }
    }

    /// Serialize `value` as the content of data file `name`. A value that
    /// has no JSON representation is logged and dropped.
    pub fn serialize<T: Serialize + ?Sized>(name: impl Into<String>, value: &T) -> Option<Self> {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(data) => Some(PluginData { name, data }),
            Err(e) => {
                warn!(file = %name, error = %e, "dropping plugin data that cannot be serialized");
                None
            }
        }
    }
}

/// Trait implemented by every report plugin
pub trait Plugin {
    /// Name used to enable the plugin in configuration
    fn name(&self) -> &str;

    /// Adjust a test case before it is processed and written
    fn prepare(&mut self, _test_case: &mut AllureTestCase) {}

    /// Observe a finished test case
    fn process(&mut self, test_case: &AllureTestCase);

    /// Data files to write into the report
    fn data(&self) -> Vec<PluginData>;
}

type PluginFactory = fn() -> Box<dyn Plugin>;

/// Named plugin factories available to a report build.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: Vec<(String, PluginFactory)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        PluginRegistry::default()
    }

    /// Registry containing the plugins bundled with this crate.
    pub fn builtin() -> Self {
        let mut registry = PluginRegistry::new();
        registry.register(summary::NAME, || Box::new(SummaryPlugin::new()));
        registry.register(xunit::NAME, || Box::new(XUnitPlugin::new()));
        registry.register(defects::NAME, || Box::new(DefectsPlugin::new()));
        registry
    }

    /// Register a factory; a later registration replaces an earlier one
    /// with the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: PluginFactory) {
        let name = name.into();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, factory));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    fn instantiate(&self) -> impl Iterator<Item = (&str, Box<dyn Plugin>)> {
        self.factories
            .iter()
            .map(|(name, factory)| (name.as_str(), factory()))
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Produces the plugins used for a report build
pub trait PluginLoader {
    fn load_plugins(&self) -> Vec<Box<dyn Plugin>>;
}

/// Loads plugins from a [`PluginRegistry`], optionally restricted to an
/// enabled subset.
#[derive(Debug, Clone)]
pub struct RegistryPluginLoader {
    registry: PluginRegistry,
    enabled: Option<Vec<String>>,
}

impl RegistryPluginLoader {
    pub fn new(registry: PluginRegistry, enabled: Option<Vec<String>>) -> Self {
        RegistryPluginLoader { registry, enabled }
    }
}

impl PluginLoader for RegistryPluginLoader {
    fn load_plugins(&self) -> Vec<Box<dyn Plugin>> {
        let Some(ref enabled) = self.enabled else {
            return self.registry.instantiate().map(|(_, p)| p).collect();
        };

        for name in enabled {
            if !self.registry.contains(name) {
                warn!(plugin = %name, "unknown plugin requested, ignoring");
            }
        }

        let enabled: HashSet<&str> = enabled.iter().map(String::as_str).collect();
        self.registry
            .instantiate()
            .filter(|(name, _)| enabled.contains(name))
            .map(|(_, plugin)| plugin)
            .collect()
    }
}

/// Runs test cases through the loaded plugins.
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub fn new(loader: &dyn PluginLoader) -> Self {
        let plugins = loader.load_plugins();
        debug!(
            plugins = ?plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "loaded plugins"
        );
        PluginManager { plugins }
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn prepare(&mut self, test_case: &mut AllureTestCase) {
        for plugin in &mut self.plugins {
            plugin.prepare(test_case);
        }
    }

    pub fn process(&mut self, test_case: &AllureTestCase) {
        for plugin in &mut self.plugins {
            plugin.process(test_case);
        }
    }

    /// Collected data of all plugins, in load order
    pub fn data(&self) -> Vec<PluginData> {
        self.plugins.iter().flat_map(|p| p.data()).collect()
    }
}
