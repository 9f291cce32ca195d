use std::marker::PhantomData;
use std::ops::Index;

use crate::options::{OptionManager, ParsedOptions};

use super::discovery::PluginSource;
use super::entry_point::{Distribution, EntryPoint};
use super::handle::PluginHandle;
use super::registry::PluginRegistry;
use super::{BoxError, PluginError, PluginLoadError};

/// A kind of plugin the host knows how to drive.
pub trait PluginCategory {
    /// Namespace plugins of this category are registered under.
    const NAMESPACE: &'static str;
    /// Key of this category in the local plugin settings.
    const LOCAL_SECTION: &'static str;
}

/// Plugins that report problems in source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkers;

impl PluginCategory for Checkers {
    const NAMESPACE: &'static str = "lint.extension";
    const LOCAL_SECTION: &'static str = "extension";
}

/// Plugins that format reported problems.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatters;

impl PluginCategory for ReportFormatters {
    const NAMESPACE: &'static str = "lint.report";
    const LOCAL_SECTION: &'static str = "report";
}

/// Drives the load, register and provide phases for one plugin category.
///
/// The registry is built eagerly by [`LifecycleManager::new`]. Phases must
/// be run in order; [`register_options`](Self::register_options) and
/// [`provide_options`](Self::provide_options) do not check that loading
/// completed.
pub struct LifecycleManager<C: PluginCategory> {
    registry: PluginRegistry,
    plugins_loaded: bool,
    _category: PhantomData<C>,
}

impl<C: PluginCategory> LifecycleManager<C> {
    pub fn new(
        source: &dyn PluginSource,
        local_plugins: Option<Vec<EntryPoint>>,
    ) -> Result<Self, PluginError> {
        Ok(Self {
            registry: PluginRegistry::new(C::NAMESPACE, source, local_plugins)?,
            plugins_loaded: false,
            _category: PhantomData,
        })
    }

    pub fn namespace(&self) -> &'static str {
        C::NAMESPACE
    }

    pub fn plugins_loaded(&self) -> bool {
        self.plugins_loaded
    }

    /// Load every plugin in collection order, stopping at the first failure.
    ///
    /// Plugins loaded before the failure stay loaded, but the manager is only
    /// marked loaded after a complete pass. Once that happens further calls
    /// return immediately.
    pub fn load_plugins(&mut self) -> Result<(), PluginLoadError> {
        if self.plugins_loaded {
            return Ok(());
        }

        let span = tracing::info_span!("plugins.load", namespace = C::NAMESPACE);
        let _guard = span.enter();

        self.registry
            .map_mut(PluginHandle::load)
            .collect::<Result<(), _>>()?;

        self.plugins_loaded = true;
        tracing::info!(count = self.registry.len(), "Plugins loaded");
        Ok(())
    }

    /// Let every plugin add its options to `optmanager`.
    pub fn register_options(&self, optmanager: &mut OptionManager) -> Result<(), BoxError> {
        let span = tracing::info_span!("plugins.register_options", namespace = C::NAMESPACE);
        let _guard = span.enter();

        self.registry
            .map(|handle| handle.register_options(optmanager))
            .collect()
    }

    /// Hand the parsed configuration to every plugin.
    pub fn provide_options(
        &mut self,
        optmanager: &mut OptionManager,
        options: &mut ParsedOptions,
        extra_args: &[String],
    ) -> Result<(), BoxError> {
        let span = tracing::info_span!("plugins.provide_options", namespace = C::NAMESPACE);
        let _guard = span.enter();

        self.registry
            .map_mut(|handle| handle.provide_options(optmanager, options, extra_args))
            .collect()
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn plugins(&self) -> &[PluginHandle] {
        self.registry.plugins()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&PluginHandle> {
        self.registry.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PluginHandle> {
        self.registry.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn versions(&self) -> Vec<&Distribution> {
        self.registry.versions()
    }
}

impl<C: PluginCategory> Index<&str> for LifecycleManager<C> {
    type Output = PluginHandle;

    fn index(&self, name: &str) -> &PluginHandle {
        self.get(name).unwrap_or_else(|| {
            panic!(
                "no plugin named '{name}' in namespace '{}'",
                C::NAMESPACE
            )
        })
    }
}

impl<'a, C: PluginCategory> IntoIterator for &'a LifecycleManager<C> {
    type Item = &'a PluginHandle;
    type IntoIter = std::slice::Iter<'a, PluginHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins().iter()
    }
}

impl<C: PluginCategory> std::fmt::Debug for LifecycleManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("namespace", &C::NAMESPACE)
            .field("plugins_loaded", &self.plugins_loaded)
            .field("registry", &self.registry)
            .finish()
    }
}
