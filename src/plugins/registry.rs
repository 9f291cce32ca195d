//! Ordered, name-keyed collection of plugin handles for one namespace.

use std::collections::{BTreeSet, HashMap};

use super::PluginError;
use super::discovery::PluginSource;
use super::entry_point::{Distribution, EntryPoint};
use super::handle::PluginHandle;

/// Handles discovered for a namespace, followed by local handles.
///
/// Membership is fixed at construction. When two entry points share a name
/// the later one replaces the earlier one in place, so the name keeps the
/// position of its first registration.
#[derive(Debug)]
pub struct PluginRegistry {
    namespace: String,
    handles: Vec<PluginHandle>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    pub fn new(
        namespace: impl Into<String>,
        source: &dyn PluginSource,
        local_plugins: Option<Vec<EntryPoint>>,
    ) -> Result<Self, PluginError> {
        let namespace = namespace.into();
        let discovered = source.entry_points(&namespace)?;
        tracing::debug!(
            namespace = %namespace,
            source = source.source_name(),
            count = discovered.len(),
            "Discovered plugins"
        );

        let mut registry = Self::from_entry_points(namespace, discovered);
        for entry_point in local_plugins.into_iter().flatten() {
            registry.insert(entry_point.local());
        }
        Ok(registry)
    }

    pub fn from_entry_points(
        namespace: impl Into<String>,
        entry_points: impl IntoIterator<Item = EntryPoint>,
    ) -> Self {
        let mut registry = Self {
            namespace: namespace.into(),
            handles: Vec::new(),
            index: HashMap::new(),
        };
        for entry_point in entry_points {
            registry.insert(entry_point);
        }
        registry
    }

    fn insert(&mut self, entry_point: EntryPoint) {
        let name = entry_point.name().to_string();
        match self.index.get(&name) {
            Some(&position) => {
                tracing::info!(
                    namespace = %self.namespace,
                    plugin = %name,
                    origin = %entry_point.plugin_origin(),
                    "Plugin overrides an earlier registration"
                );
                self.handles[position] = PluginHandle::new(entry_point);
            }
            None => {
                self.index.insert(name, self.handles.len());
                self.handles.push(PluginHandle::new(entry_point));
            }
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lazily apply `f` to every handle in collection order.
    pub fn map<'a, F, R>(&'a self, f: F) -> impl Iterator<Item = R> + 'a
    where
        F: FnMut(&'a PluginHandle) -> R + 'a,
    {
        self.handles.iter().map(f)
    }

    /// Like [`PluginRegistry::map`] with mutable access to each handle.
    pub fn map_mut<'a, F, R>(&'a mut self, f: F) -> impl Iterator<Item = R> + 'a
    where
        F: FnMut(&'a mut PluginHandle) -> R + 'a,
    {
        self.handles.iter_mut().map(f)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(PluginHandle::name).collect()
    }

    pub fn plugins(&self) -> &[PluginHandle] {
        &self.handles
    }

    pub fn get(&self, name: &str) -> Option<&PluginHandle> {
        self.index.get(name).map(|&i| &self.handles[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PluginHandle> {
        self.index.get(name).map(|&i| &mut self.handles[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Sorted, de-duplicated distributions of the discovered (non-local) plugins.
    pub fn versions(&self) -> Vec<&Distribution> {
        self.handles
            .iter()
            .filter(|h| !h.is_local())
            .filter_map(PluginHandle::distribution)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{BoxError, InMemorySource, Plugin};
    use std::cell::Cell;

    const NAMESPACE: &str = "testing.plugin-registry";

    struct Tagged(&'static str);

    impl Plugin for Tagged {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn entry(name: &str, tag: &'static str) -> EntryPoint {
        EntryPoint::new(name, "tests:tagged", move || -> Result<Box<dyn Plugin>, BoxError> {
            Ok(Box::new(Tagged(tag)))
        })
        .unwrap()
    }

    fn tag_of(handle: &PluginHandle) -> &'static str {
        handle.downcast_ref::<Tagged>().unwrap().0
    }

    fn source(count: usize) -> InMemorySource {
        InMemorySource::new().with_entries(
            NAMESPACE,
            (0..count).map(|i| entry(&format!("T10{i}"), "discovered")),
        )
    }

    #[test]
    fn test_discovery_order() {
        let registry = PluginRegistry::new(NAMESPACE, &source(8), None).unwrap();

        assert_eq!(registry.namespace(), NAMESPACE);
        assert_eq!(registry.len(), 8);
        let expected: Vec<String> = (0..8).map(|i| format!("T10{i}")).collect();
        assert_eq!(registry.names(), expected);
        assert!(registry.plugins().iter().all(|h| !h.is_loaded()));
    }

    #[test]
    fn test_other_namespaces_are_ignored() {
        let source = source(2).with_entry("other.namespace", entry("X100", "other"));
        let registry = PluginRegistry::new(NAMESPACE, &source, None).unwrap();
        assert!(!registry.contains("X100"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_local_plugins_appended() {
        let registry =
            PluginRegistry::new(NAMESPACE, &source(2), Some(vec![entry("L100", "local")]))
                .unwrap();

        assert_eq!(registry.names(), vec!["T100", "T101", "L100"]);
        assert!(registry.get("L100").unwrap().is_local());
        assert!(!registry.get("T100").unwrap().is_local());
    }

    #[test]
    fn test_local_plugin_overrides_discovered() {
        let mut registry =
            PluginRegistry::new(NAMESPACE, &source(3), Some(vec![entry("T101", "local")]))
                .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["T100", "T101", "T102"]);

        let handle = registry.get_mut("T101").unwrap();
        assert!(handle.is_local());
        handle.load().unwrap();
        assert_eq!(tag_of(registry.get("T101").unwrap()), "local");
    }

    #[test]
    fn test_last_local_wins() {
        let mut registry = PluginRegistry::new(
            NAMESPACE,
            &source(1),
            Some(vec![entry("L100", "first"), entry("L100", "second")]),
        )
        .unwrap();

        assert_eq!(registry.names(), vec!["T100", "L100"]);
        registry.get_mut("L100").unwrap().load().unwrap();
        assert_eq!(tag_of(registry.get("L100").unwrap()), "second");
    }

    #[test]
    fn test_map_is_lazy_and_ordered() {
        let registry = PluginRegistry::new(NAMESPACE, &source(4), None).unwrap();
        let calls = Cell::new(0);
        let mut visited = Vec::new();

        let mut iter = registry.map(|h| {
            calls.set(calls.get() + 1);
            h.name().to_string()
        });
        assert_eq!(calls.get(), 0);
        visited.push(iter.next().unwrap());
        visited.push(iter.next().unwrap());
        drop(iter);

        assert_eq!(calls.get(), 2);
        assert_eq!(visited, vec!["T100", "T101"]);
        let all: Vec<String> = registry.map(|h| h.name().to_string()).collect();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_map_mut_stops_at_first_error() {
        let mut registry = PluginRegistry::new(NAMESPACE, &source(4), None).unwrap();

        let result: Result<Vec<()>, &str> = registry
            .map_mut(|h| {
                if h.name() == "T102" {
                    return Err("stop");
                }
                h.load().map_err(|_| "load")
            })
            .collect();

        assert_eq!(result, Err("stop"));
        let loaded: Vec<bool> = registry.plugins().iter().map(PluginHandle::is_loaded).collect();
        assert_eq!(loaded, vec![true, true, false, false]);
    }

    #[test]
    fn test_versions() {
        let source = InMemorySource::new().with_entries(
            NAMESPACE,
            [
                entry("B1", "b").distribution(Distribution::new("lint-b", "2.0.0")),
                entry("A1", "a").distribution(Distribution::new("lint-a", "1.0.0")),
                entry("A2", "a").distribution(Distribution::new("lint-a", "1.0.0")),
                entry("N1", "none"),
            ],
        );
        let local = entry("L1", "local").distribution(Distribution::new("lint-local", "0.0.1"));
        let registry = PluginRegistry::new(NAMESPACE, &source, Some(vec![local])).unwrap();

        let versions: Vec<(&str, &str)> = registry
            .versions()
            .into_iter()
            .map(|d| (d.name.as_str(), d.version.as_str()))
            .collect();
        assert_eq!(versions, vec![("lint-a", "1.0.0"), ("lint-b", "2.0.0")]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = PluginRegistry::new(NAMESPACE, &InMemorySource::new(), None).unwrap();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
        assert!(registry.get("T100").is_none());
    }
}
