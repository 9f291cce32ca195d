use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::factory::PluginFactories;
use super::plugin::PluginLoader;
use super::{BoxError, Plugin, PluginError};

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid name regex"))
}

pub fn validate_name(name: &str) -> Result<(), PluginError> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(PluginError::InvalidName {
            name: name.to_string(),
            reason: "must start with an alphanumeric and contain only [A-Za-z0-9_.-]".into(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginOrigin {
    #[default]
    Discovered,
    Local,
}

impl fmt::Display for PluginOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovered => write!(f, "discovered"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Package that shipped a plugin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub version: String,
}

impl Distribution {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A named, not yet materialized plugin.
#[derive(Clone)]
pub struct EntryPoint {
    name: String,
    target: String,
    loader: Arc<dyn PluginLoader>,
    distribution: Option<Distribution>,
    origin: PluginOrigin,
}

impl EntryPoint {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        loader: impl PluginLoader + 'static,
    ) -> Result<Self, PluginError> {
        Self::with_loader(name, target, Arc::new(loader))
    }

    pub fn with_loader(
        name: impl Into<String>,
        target: impl Into<String>,
        loader: Arc<dyn PluginLoader>,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            target: target.into(),
            loader,
            distribution: None,
            origin: PluginOrigin::Discovered,
        })
    }

    /// Parse `NAME = target`, resolving `target` lazily through `factories`.
    pub fn parse(
        spec: &str,
        factories: &Arc<PluginFactories>,
        origin: PluginOrigin,
    ) -> Result<Self, PluginError> {
        let (name, target) = spec
            .split_once('=')
            .map(|(n, t)| (n.trim(), t.trim()))
            .filter(|(n, t)| !n.is_empty() && !t.is_empty())
            .ok_or_else(|| PluginError::InvalidEntryPoint {
                spec: spec.to_string(),
            })?;

        let loader = PluginFactories::deferred(factories, target);
        Ok(Self::with_loader(name, target, loader)?.origin(origin))
    }

    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn origin(mut self, origin: PluginOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn local(self) -> Self {
        self.origin(PluginOrigin::Local)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn dist(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn plugin_origin(&self) -> PluginOrigin {
        self.origin
    }

    pub fn is_local(&self) -> bool {
        self.origin == PluginOrigin::Local
    }

    pub fn resolve(&self) -> Result<Box<dyn Plugin>, BoxError> {
        self.loader.load()
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("distribution", &self.distribution)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
