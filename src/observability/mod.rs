//! Tracing configuration for hosts embedding the plugin lifecycle.
//!
//! The crate only emits `tracing` events and spans. Hosts that already
//! install a subscriber need nothing from here; others can enable the
//! `subscriber` feature and call [`init_tracing`].
//!
//! ```toml
//! plugin-lifecycle = { version = "0.1", features = ["subscriber"] }
//! ```

#[cfg(feature = "subscriber")]
mod subscriber;

#[cfg(feature = "subscriber")]
pub use subscriber::{ObservabilityError, init_tracing};

use std::fmt;

#[derive(Clone, Debug, Default)]
pub struct TracingConfig {
    pub service_name: Option<String>,
    pub enabled: bool,
    pub level: TracingLevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TracingLevel {
    #[default]
    Info,
    Debug,
    Trace,
}

impl TracingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        match &self.service_name {
            Some(name) => format!("{},{}={}", TracingLevel::Info, name, self.level),
            None => self.level.to_string(),
        }
    }
}
