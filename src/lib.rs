//! # plugin-lifecycle
//!
//! Plugin discovery and lifecycle management for lint-style host
//! applications.
//!
//! A host keeps one [`LifecycleManager`] per plugin category. The manager
//! collects plugins from a [`PluginSource`] plus locally configured entry
//! points, then drives them through three phases: load, option registration
//! and option delivery.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use plugin_lifecycle::config::SettingsLoader;
//! use plugin_lifecycle::options::OptionManager;
//! use plugin_lifecycle::plugins::{Checkers, LifecycleManager, ManifestSource, PluginFactories};
//!
//! fn main() -> Result<(), plugin_lifecycle::Error> {
//!     let settings = SettingsLoader::load_merged(std::path::Path::new("."))?.with_env();
//!     let factories = Arc::new(PluginFactories::new());
//!     let source = ManifestSource::new(settings.search_dirs(), Arc::clone(&factories));
//!
//!     let local = settings.local_entry_points::<Checkers>(&factories)?;
//!     let mut checkers = LifecycleManager::<Checkers>::new(&source, Some(local))?;
//!     checkers.load_plugins()?;
//!
//!     let mut optmanager = OptionManager::new("lint", "1.0.0");
//!     checkers.register_options(&mut optmanager)?;
//!
//!     let mut options = optmanager.parse_config(&serde_json::Map::new())?;
//!     checkers.provide_options(&mut optmanager, &mut options, &[])?;
//!
//!     for name in checkers.names() {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod observability;
pub mod options;
pub mod plugins;
pub mod prelude;

pub use config::{ConfigError, LocalPlugins, PluginSettings, SettingsLoader};
pub use observability::{TracingConfig, TracingLevel};
pub use options::{OptionError, OptionManager, OptionSpec, ParsedOptions};
pub use plugins::{
    BoxError, ChainSource, Checkers, Distribution, EntryPoint, InMemorySource, LifecycleManager,
    ManifestSource, Plugin, PluginCategory, PluginError, PluginFactories, PluginHandle,
    PluginLoadError, PluginLoader, PluginOrigin, PluginRegistry, PluginSource, ReportFormatters,
};

/// Error type for plugin-lifecycle operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Discovery or entry point construction failed.
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// A plugin could not be loaded.
    #[error(transparent)]
    Load(#[from] PluginLoadError),

    #[error("Option error: {0}")]
    Options(#[from] OptionError),

    /// Settings could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A plugin callback returned an error.
    #[error("Plugin callback failed: {0}")]
    Callback(#[from] BoxError),
}

impl Error {
    /// Name of the plugin involved, when known.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            Error::Load(e) => Some(e.plugin_name()),
            Error::Plugin(PluginError::NotLoaded { name })
            | Error::Plugin(PluginError::InvalidName { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::Load(_))
    }
}

/// Result type alias for plugin-lifecycle operations.
pub type Result<T> = std::result::Result<T, Error>;
