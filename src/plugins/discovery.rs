use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::PluginError;
use super::entry_point::EntryPoint;
use super::factory::PluginFactories;
use super::manifest::{PLUGIN_CONFIG_DIR, PluginDescriptor, PluginManifest};

/// Yields the entry points registered under a namespace, in discovery order.
pub trait PluginSource {
    fn source_name(&self) -> &str;

    fn entry_points(&self, namespace: &str) -> Result<Vec<EntryPoint>, PluginError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entries: HashMap<String, Vec<EntryPoint>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, namespace: impl Into<String>, entry_point: EntryPoint) -> Self {
        self.add(namespace, entry_point);
        self
    }

    pub fn with_entries(
        mut self,
        namespace: impl Into<String>,
        entry_points: impl IntoIterator<Item = EntryPoint>,
    ) -> Self {
        self.entries
            .entry(namespace.into())
            .or_default()
            .extend(entry_points);
        self
    }

    pub fn add(&mut self, namespace: impl Into<String>, entry_point: EntryPoint) {
        self.entries
            .entry(namespace.into())
            .or_default()
            .push(entry_point);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PluginSource for InMemorySource {
    fn source_name(&self) -> &str {
        "in-memory"
    }

    fn entry_points(&self, namespace: &str) -> Result<Vec<EntryPoint>, PluginError> {
        Ok(self.entries.get(namespace).cloned().unwrap_or_default())
    }
}

/// Scans plugin directories for `.lint-plugin/plugin.json` manifests.
pub struct ManifestSource {
    dirs: Vec<PathBuf>,
    factories: Arc<PluginFactories>,
}

impl ManifestSource {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>, factories: Arc<PluginFactories>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
            factories,
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every distribution found under the configured directories.
    ///
    /// A directory is either a plugin root itself or a parent whose children
    /// are plugin roots. Children are visited in path order; missing
    /// directories are skipped.
    pub fn discover(&self) -> Result<Vec<PluginDescriptor>, PluginError> {
        let mut descriptors = Vec::new();

        for dir in &self.dirs {
            if !dir.exists() {
                tracing::debug!(dir = %dir.display(), "Skipping missing plugin directory");
                continue;
            }

            if Self::is_plugin_root(dir) {
                let manifest = PluginManifest::load(dir)?;
                descriptors.push(PluginDescriptor::new(manifest, dir.clone()));
            } else {
                Self::scan_children(dir, &mut descriptors)?;
            }
        }

        Self::validate(&descriptors)?;
        Ok(descriptors)
    }

    fn is_plugin_root(dir: &Path) -> bool {
        dir.join(PLUGIN_CONFIG_DIR).is_dir()
    }

    fn scan_children(
        parent: &Path,
        descriptors: &mut Vec<PluginDescriptor>,
    ) -> Result<(), PluginError> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(parent)? {
            let path = entry?.path();
            if path.is_dir() && Self::is_plugin_root(&path) {
                children.push(path);
            }
        }
        children.sort();

        for path in children {
            let manifest = PluginManifest::load(&path)?;
            descriptors.push(PluginDescriptor::new(manifest, path));
        }

        Ok(())
    }

    fn validate(descriptors: &[PluginDescriptor]) -> Result<(), PluginError> {
        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for descriptor in descriptors {
            if let Some(first) = seen.get(descriptor.name()) {
                return Err(PluginError::DuplicateDistribution {
                    name: descriptor.name().to_string(),
                    first: first.to_path_buf(),
                    second: descriptor.root_dir().to_path_buf(),
                });
            }
            seen.insert(descriptor.name(), descriptor.root_dir());
        }
        Ok(())
    }
}

impl PluginSource for ManifestSource {
    fn source_name(&self) -> &str {
        "manifest"
    }

    fn entry_points(&self, namespace: &str) -> Result<Vec<EntryPoint>, PluginError> {
        let mut entry_points = Vec::new();
        for descriptor in self.discover()? {
            entry_points.extend(descriptor.entry_points(namespace, &self.factories)?);
        }
        tracing::debug!(
            namespace,
            count = entry_points.len(),
            dirs = self.dirs.len(),
            "Discovered plugins from manifests"
        );
        Ok(entry_points)
    }
}

/// Concatenates sources in the order they were added.
#[derive(Default)]
pub struct ChainSource {
    sources: Vec<Box<dyn PluginSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl PluginSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn add(&mut self, source: impl PluginSource + 'static) {
        self.sources.push(Box::new(source));
    }
}

impl PluginSource for ChainSource {
    fn source_name(&self) -> &str {
        "chain"
    }

    fn entry_points(&self, namespace: &str) -> Result<Vec<EntryPoint>, PluginError> {
        let mut entry_points = Vec::new();
        for source in &self.sources {
            let found = source.entry_points(namespace)?;
            tracing::trace!(source = source.source_name(), count = found.len(), "Source scanned");
            entry_points.extend(found);
        }
        Ok(entry_points)
    }
}
