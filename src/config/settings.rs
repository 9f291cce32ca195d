//! Plugin settings with hierarchical loading.
//!
//! Loads settings from (lowest to highest priority):
//! 1. User settings: ~/.lint/plugins.json
//! 2. Project settings: .lint/plugins.json
//!
//! Lists from later files are appended to earlier ones. Relative paths are
//! resolved against the directory that holds the `.lint` folder.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::plugins::{EntryPoint, PluginCategory, PluginError, PluginFactories, PluginOrigin};

/// Extra plugin directories, in platform path-list syntax.
pub const PLUGIN_PATH_ENV: &str = "LINT_PLUGIN_PATH";

const SETTINGS_DIR: &str = ".lint";
const SETTINGS_FILE: &str = "plugins.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSource {
    #[default]
    User,
    Project,
}

/// Plugins supplied by the host configuration rather than discovered.
///
/// ```json
/// {
///   "paths": ["tools/lint"],
///   "extension": ["X1 = local:checker"],
///   "report": ["fancy = local:fancy"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalPlugins {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,

    /// `NAME = target` specs keyed by category section.
    #[serde(flatten)]
    pub sections: BTreeMap<String, Vec<String>>,
}

impl LocalPlugins {
    pub fn section(&self, name: &str) -> &[String] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.sections.values().all(Vec::is_empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(skip)]
    pub source: SettingsSource,

    #[serde(default)]
    pub plugin_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub local_plugins: LocalPlugins,

    #[serde(skip)]
    env_dirs: Vec<PathBuf>,
}

impl PluginSettings {
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a settings file; a missing file yields defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Append directories from [`PLUGIN_PATH_ENV`].
    pub fn with_env(self) -> Self {
        match std::env::var_os(PLUGIN_PATH_ENV) {
            Some(value) => self.with_plugin_path(&value),
            None => self,
        }
    }

    pub fn with_plugin_path(mut self, value: &OsStr) -> Self {
        self.env_dirs.extend(
            std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty()),
        );
        self
    }

    /// Directories to scan for plugin manifests, in priority order.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let candidates = self
            .plugin_dirs
            .iter()
            .chain(&self.local_plugins.paths)
            .chain(&self.env_dirs)
            .cloned()
            .chain(default_plugins_dir());

        for dir in candidates {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Local entry points configured for category `C`.
    pub fn local_entry_points<C: PluginCategory>(
        &self,
        factories: &Arc<PluginFactories>,
    ) -> Result<Vec<EntryPoint>, PluginError> {
        self.local_plugins
            .section(C::LOCAL_SECTION)
            .iter()
            .map(|spec| EntryPoint::parse(spec, factories, PluginOrigin::Local))
            .collect()
    }

    fn resolve_relative(&mut self, base: &Path) {
        for dir in self
            .plugin_dirs
            .iter_mut()
            .chain(self.local_plugins.paths.iter_mut())
        {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    fn merge(&mut self, other: PluginSettings) {
        self.source = other.source;
        self.plugin_dirs.extend(other.plugin_dirs);
        self.local_plugins.paths.extend(other.local_plugins.paths);
        for (section, specs) in other.local_plugins.sections {
            self.local_plugins
                .sections
                .entry(section)
                .or_default()
                .extend(specs);
        }
    }
}

/// Returns the default plugins directory: `~/.lint/plugins/`.
pub fn default_plugins_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|d| d.home_dir().join(SETTINGS_DIR).join("plugins"))
}

fn user_settings_base() -> Option<PathBuf> {
    directories::UserDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Settings loader that merges user and project files.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    settings: PluginSettings,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings for a project.
    /// Priority (lowest to highest): User → Project
    pub fn load(&mut self, project_dir: &Path) -> ConfigResult<&PluginSettings> {
        if let Some(home) = user_settings_base() {
            self.merge_dir(&home, SettingsSource::User)?;
        }
        self.merge_dir(project_dir, SettingsSource::Project)?;
        Ok(&self.settings)
    }

    /// Merge `<base>/.lint/plugins.json` if it exists.
    pub fn merge_dir(&mut self, base: &Path, source: SettingsSource) -> ConfigResult<()> {
        let path = base.join(SETTINGS_DIR).join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(());
        }

        let mut settings = PluginSettings::from_file(&path).map_err(|e| match e {
            ConfigError::Serialization(e) => ConfigError::InvalidValue {
                key: path.display().to_string(),
                message: e.to_string(),
            },
            other => other,
        })?;
        settings.source = source;
        settings.resolve_relative(base);
        tracing::debug!(path = %path.display(), source = ?source, "Loaded plugin settings");

        self.settings.merge(settings);
        Ok(())
    }

    pub fn load_merged(project_dir: &Path) -> ConfigResult<PluginSettings> {
        let mut loader = Self::new();
        loader.load(project_dir)?;
        Ok(loader.settings)
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn into_settings(self) -> PluginSettings {
        self.settings
    }
}
