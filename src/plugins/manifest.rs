use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::PluginError;
use super::entry_point::{Distribution, EntryPoint, PluginOrigin};
use super::factory::PluginFactories;

pub(super) const PLUGIN_CONFIG_DIR: &str = ".lint-plugin";
const PLUGIN_MANIFEST_FILE: &str = "plugin.json";

/// `plugin.json` of a plugin distribution.
///
/// ```json
/// {
///   "name": "lint-naming",
///   "version": "0.4.0",
///   "entry_points": { "lint.extension": ["N8 = naming:checker"] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entry_points: BTreeMap<String, Vec<String>>,
}

impl PluginManifest {
    pub fn load(root_dir: &Path) -> Result<Self, PluginError> {
        let manifest_path = root_dir.join(PLUGIN_CONFIG_DIR).join(PLUGIN_MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(PluginError::ManifestNotFound {
                path: manifest_path,
            });
        }
        let content = std::fs::read_to_string(&manifest_path)?;
        serde_json::from_str(&content).map_err(|e| PluginError::InvalidManifest {
            path: manifest_path,
            reason: e.to_string(),
        })
    }

    pub fn distribution(&self) -> Distribution {
        Distribution::new(&self.name, &self.version)
    }
}

#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub(crate) manifest: PluginManifest,
    pub(crate) root_dir: PathBuf,
}

impl PluginDescriptor {
    pub(crate) fn new(manifest: PluginManifest, root_dir: PathBuf) -> Self {
        Self { manifest, root_dir }
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Entry points this distribution declares for `namespace`, in manifest order.
    pub fn entry_points(
        &self,
        namespace: &str,
        factories: &Arc<PluginFactories>,
    ) -> Result<Vec<EntryPoint>, PluginError> {
        let Some(specs) = self.manifest.entry_points.get(namespace) else {
            return Ok(Vec::new());
        };

        specs
            .iter()
            .map(|spec| {
                EntryPoint::parse(spec, factories, PluginOrigin::Discovered)
                    .map(|ep| ep.distribution(self.manifest.distribution()))
            })
            .collect()
    }
}
