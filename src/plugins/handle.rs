use std::fmt;

use crate::options::{ENABLE_EXTENSIONS, IGNORE, OptionManager, ParsedOptions};

use super::entry_point::{Distribution, EntryPoint};
use super::{BoxError, Plugin, PluginError, PluginLoadError};

/// One discovered plugin, before and after loading.
///
/// `implementation` is `None` until [`PluginHandle::load`] succeeds. Loading
/// again re-resolves the entry point and replaces the previous implementation.
pub struct PluginHandle {
    entry_point: EntryPoint,
    implementation: Option<Box<dyn Plugin>>,
}

impl PluginHandle {
    pub fn new(entry_point: EntryPoint) -> Self {
        Self {
            entry_point,
            implementation: None,
        }
    }

    pub fn name(&self) -> &str {
        self.entry_point.name()
    }

    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        self.entry_point.dist()
    }

    pub fn is_local(&self) -> bool {
        self.entry_point.is_local()
    }

    pub fn is_loaded(&self) -> bool {
        self.implementation.is_some()
    }

    pub fn implementation(&self) -> Option<&dyn Plugin> {
        self.implementation.as_deref()
    }

    pub fn implementation_mut(&mut self) -> Option<&mut (dyn Plugin + 'static)> {
        self.implementation.as_deref_mut()
    }

    /// Downcast the loaded implementation to a concrete plugin type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.implementation()?.as_any().downcast_ref::<T>()
    }

    pub fn load(&mut self) -> Result<(), PluginLoadError> {
        tracing::debug!(
            plugin = %self.name(),
            target = %self.entry_point.target(),
            "Loading plugin"
        );
        match self.entry_point.resolve() {
            Ok(implementation) => {
                self.implementation = Some(implementation);
                Ok(())
            }
            Err(e) => {
                tracing::error!(plugin = %self.name(), error = %e, "Failed to load plugin");
                Err(PluginLoadError::new(self.name(), e))
            }
        }
    }

    pub fn register_options(&self, optmanager: &mut OptionManager) -> Result<(), BoxError> {
        let implementation = self.loaded()?;
        tracing::debug!(plugin = %self.name(), "Registering options");
        implementation.register_options(optmanager)?;

        if implementation.off_by_default() {
            optmanager.extend_default_ignore([self.name()]);
        }
        Ok(())
    }

    pub fn provide_options(
        &mut self,
        optmanager: &mut OptionManager,
        options: &mut ParsedOptions,
        extra_args: &[String],
    ) -> Result<(), BoxError> {
        let name = self.entry_point.name();
        let implementation = self
            .implementation
            .as_deref_mut()
            .ok_or_else(|| PluginError::NotLoaded {
                name: name.to_string(),
            })?;

        tracing::debug!(plugin = %name, "Providing options");
        implementation.provide_options(optmanager, options, extra_args)?;

        if options.get_list(ENABLE_EXTENSIONS).contains(&name) {
            tracing::debug!(plugin = %name, "Enabling off-by-default plugin");
            optmanager.remove_from_default_ignore([name]);
            options.remove_from_list(IGNORE, name);
        }
        Ok(())
    }

    fn loaded(&self) -> Result<&dyn Plugin, PluginError> {
        self.implementation()
            .ok_or_else(|| PluginError::NotLoaded {
                name: self.name().to_string(),
            })
    }
}

impl fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("entry_point", &self.entry_point)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionSpec;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Extension {
        off: bool,
        seen_extra_args: Vec<String>,
    }

    impl Plugin for Extension {
        fn register_options(&self, optmanager: &mut OptionManager) -> Result<(), BoxError> {
            optmanager.add_option(OptionSpec::new("ext_level").default_value(1))?;
            Ok(())
        }

        fn provide_options(
            &mut self,
            _optmanager: &mut OptionManager,
            _options: &mut ParsedOptions,
            extra_args: &[String],
        ) -> Result<(), BoxError> {
            self.seen_extra_args = extra_args.to_vec();
            Ok(())
        }

        fn off_by_default(&self) -> bool {
            self.off
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn handle(name: &str, off: bool) -> PluginHandle {
        let ep = EntryPoint::new(name, "tests:extension", move || -> Result<Box<dyn Plugin>, BoxError> {
            Ok(Box::new(Extension {
                off,
                seen_extra_args: Vec::new(),
            }))
        })
        .unwrap();
        PluginHandle::new(ep)
    }

    #[test]
    fn test_new_handle_is_unloaded() {
        let handle = handle("X100", false);
        assert_eq!(handle.name(), "X100");
        assert!(!handle.is_loaded());
        assert!(handle.implementation().is_none());
        assert!(!handle.is_local());
    }

    #[test]
    fn test_load_materializes_implementation() {
        let mut handle = handle("X100", false);
        handle.load().unwrap();
        assert!(handle.is_loaded());
        assert!(handle.downcast_ref::<Extension>().is_some());
    }

    #[test]
    fn test_load_failure_keeps_handle_unloaded() {
        let ep = EntryPoint::new("T101", "tests:broken", || -> Result<Box<dyn Plugin>, BoxError> {
            Err("Test failure".into())
        })
        .unwrap();
        let mut handle = PluginHandle::new(ep);

        let err = handle.load().unwrap_err();
        assert_eq!(err.plugin_name(), "T101");
        assert_eq!(err.cause().to_string(), "Test failure");
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_repeated_load_re_resolves() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let ep = EntryPoint::new("X100", "tests:counted", move || -> Result<Box<dyn Plugin>, BoxError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Extension {
                off: false,
                seen_extra_args: Vec::new(),
            }))
        })
        .unwrap();
        let mut handle = PluginHandle::new(ep);

        handle.load().unwrap();
        handle.load().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_phases_before_load_report_not_loaded() {
        let mut handle = handle("X100", false);
        let mut optmanager = OptionManager::new("lint", "1.0.0");
        let mut options = ParsedOptions::new();

        let err = handle.register_options(&mut optmanager).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PluginError>(),
            Some(PluginError::NotLoaded { name }) if name == "X100"
        ));

        let err = handle
            .provide_options(&mut optmanager, &mut options, &[])
            .unwrap_err();
        assert!(err.downcast_ref::<PluginError>().is_some());
    }

    #[test]
    fn test_register_options_delegates() {
        let mut handle = handle("X100", false);
        handle.load().unwrap();
        let mut optmanager = OptionManager::new("lint", "1.0.0");

        handle.register_options(&mut optmanager).unwrap();
        assert!(optmanager.get("ext_level").is_some());
        assert!(optmanager.extended_default_ignore().is_empty());

        // second registration surfaces the plugin's own error untouched
        let err = handle.register_options(&mut optmanager).unwrap_err();
        assert!(err.to_string().contains("ext_level"));
    }

    #[test]
    fn test_off_by_default_extends_default_ignore() {
        let mut handle = handle("X200", true);
        handle.load().unwrap();
        let mut optmanager = OptionManager::new("lint", "1.0.0");

        handle.register_options(&mut optmanager).unwrap();
        assert_eq!(optmanager.extended_default_ignore(), ["X200"]);
    }

    #[test]
    fn test_provide_options_enables_extension() {
        let mut handle = handle("X200", true);
        handle.load().unwrap();
        let mut optmanager = OptionManager::new("lint", "1.0.0");
        handle.register_options(&mut optmanager).unwrap();

        let mut options = ParsedOptions::new();
        options.set(ENABLE_EXTENSIONS, json!(["X200"]));
        options.set(IGNORE, json!(["E501", "X200"]));
        let extra_args = vec!["src/".to_string()];

        handle
            .provide_options(&mut optmanager, &mut options, &extra_args)
            .unwrap();

        assert!(optmanager.extended_default_ignore().is_empty());
        assert_eq!(options.get_list(IGNORE), vec!["E501"]);
        let plugin = handle.downcast_ref::<Extension>().unwrap();
        assert_eq!(plugin.seen_extra_args, extra_args);
    }
}
