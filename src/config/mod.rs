//! Plugin settings loaded from JSON files and the environment.
//!
//! ```rust,no_run
//! use plugin_lifecycle::config::SettingsLoader;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsLoader::load_merged(std::path::Path::new("."))?.with_env();
//! for dir in settings.search_dirs() {
//!     println!("{}", dir.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod settings;

pub use settings::{LocalPlugins, PLUGIN_PATH_ENV, PluginSettings, SettingsLoader, SettingsSource};

use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
