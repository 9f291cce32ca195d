//! Build-time table of plugin constructors keyed by target string.

use std::collections::HashMap;
use std::sync::Arc;

use super::plugin::PluginLoader;
use super::{BoxError, Plugin, PluginError};

type Constructor = Arc<dyn Fn() -> Result<Box<dyn Plugin>, BoxError> + Send + Sync>;

#[derive(Default, Clone)]
pub struct PluginFactories {
    constructors: HashMap<String, Constructor>,
}

impl PluginFactories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, target: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Plugin>, BoxError> + Send + Sync + 'static,
    {
        self.register(target, constructor);
        self
    }

    pub fn register<F>(&mut self, target: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Box<dyn Plugin>, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(target.into(), Arc::new(constructor));
    }

    pub fn contains(&self, target: &str) -> bool {
        self.constructors.contains_key(target)
    }

    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        targets.sort_unstable();
        targets
    }

    pub fn construct(&self, target: &str) -> Result<Box<dyn Plugin>, BoxError> {
        let constructor = self
            .constructors
            .get(target)
            .ok_or_else(|| PluginError::UnknownTarget {
                target: target.to_string(),
            })?;
        constructor()
    }

    /// Loader that looks `target` up only when the plugin is loaded.
    pub fn deferred(factories: &Arc<Self>, target: &str) -> Arc<dyn PluginLoader> {
        Arc::new(DeferredLoader {
            factories: Arc::clone(factories),
            target: target.to_string(),
        })
    }
}

struct DeferredLoader {
    factories: Arc<PluginFactories>,
    target: String,
}

impl PluginLoader for DeferredLoader {
    fn load(&self) -> Result<Box<dyn Plugin>, BoxError> {
        self.factories.construct(&self.target)
    }
}
