//! Plugin discovery and lifecycle management.
//!
//! Plugins are registered under a namespace per category (`lint.extension`
//! for checkers, `lint.report` for report formatters). A
//! [`LifecycleManager`] discovers them through a [`PluginSource`], then
//! drives three phases across all of them:
//!
//! 1. `load_plugins()` materializes every plugin, stopping at the first failure
//! 2. `register_options()` lets each plugin add options to the host
//! 3. `provide_options()` hands each plugin the parsed configuration
//!
//! Distributions installed on disk are described by a manifest:
//!
//! ```text
//! ~/.lint/plugins/
//! └── lint-naming/
//!     └── .lint-plugin/
//!         └── plugin.json
//! ```
//!
//! Manifest targets are resolved through a [`PluginFactories`] table that the
//! host fills at build time.

mod discovery;
mod entry_point;
mod error;
mod factory;
mod handle;
mod manager;
mod manifest;
mod plugin;
mod registry;

pub use discovery::{ChainSource, InMemorySource, ManifestSource, PluginSource};
pub use entry_point::{Distribution, EntryPoint, PluginOrigin, validate_name};
pub use error::{BoxError, PluginError, PluginLoadError};
pub use factory::PluginFactories;
pub use handle::PluginHandle;
pub use manager::{Checkers, LifecycleManager, PluginCategory, ReportFormatters};
pub use manifest::{PluginDescriptor, PluginManifest};
pub use plugin::{Plugin, PluginLoader};
pub use registry::PluginRegistry;
