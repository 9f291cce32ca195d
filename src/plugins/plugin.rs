//! Capability contract for loaded plugins.

use crate::options::{OptionManager, ParsedOptions};

use super::BoxError;

/// A materialized plugin.
///
/// Both lifecycle hooks default to no-ops so a plugin only implements the
/// phases it cares about. Category-specific behavior (checks, report
/// formatting) lives on the host's own traits and is reached through
/// [`Plugin::as_any`].
pub trait Plugin: Send + Sync {
    /// Add this plugin's options to the host's option manager.
    fn register_options(&self, _optmanager: &mut OptionManager) -> Result<(), BoxError> {
        Ok(())
    }

    /// Receive the parsed configuration once argument parsing is complete.
    fn provide_options(
        &mut self,
        _optmanager: &mut OptionManager,
        _options: &mut ParsedOptions,
        _extra_args: &[String],
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// Plugins that are disabled unless named in `enable_extensions`.
    fn off_by_default(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn std::any::Any;
}

/// Deferred reference to a plugin implementation.
pub trait PluginLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn Plugin>, BoxError>;
}

impl<F> PluginLoader for F
where
    F: Fn() -> Result<Box<dyn Plugin>, BoxError> + Send + Sync,
{
    fn load(&self) -> Result<Box<dyn Plugin>, BoxError> {
        self()
    }
}
