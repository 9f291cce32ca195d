use std::path::PathBuf;

/// Error raised by a plugin implementation or its loader.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid plugin manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Duplicate plugin distribution '{name}': first at {first}, second at {second}")]
    DuplicateDistribution {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid entry point '{spec}': expected 'NAME = target'")]
    InvalidEntryPoint { spec: String },

    #[error("No plugin factory registered for target '{target}'")]
    UnknownTarget { target: String },

    #[error("Plugin '{name}' has not been loaded")]
    NotLoaded { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure to materialize a plugin's implementation.
///
/// Carries the declared plugin name and whatever the loader raised.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load plugin \"{name}\": {source}")]
pub struct PluginLoadError {
    name: String,
    #[source]
    source: BoxError,
}

impl PluginLoadError {
    pub fn new(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn plugin_name(&self) -> &str {
        &self.name
    }

    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}
