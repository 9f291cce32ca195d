//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use plugin_lifecycle::prelude::*;
//! ```

// Core types
pub use crate::Error;
pub use crate::Result;

// Lifecycle
pub use crate::plugins::{Checkers, LifecycleManager, PluginCategory, ReportFormatters};
pub use crate::plugins::{BoxError, Plugin, PluginHandle, PluginLoadError};

// Discovery
pub use crate::plugins::{
    ChainSource, EntryPoint, InMemorySource, ManifestSource, PluginFactories, PluginSource,
};

// Options
pub use crate::options::{OptionManager, OptionSpec, ParsedOptions};

// Configuration
pub use crate::config::{PluginSettings, SettingsLoader};
