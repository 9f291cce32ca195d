//! Option definitions and parsed configuration passed through plugin phases.
//!
//! The host owns one [`OptionManager`] for the whole run. Plugins add their
//! options to it during registration, then receive a [`ParsedOptions`] built
//! from the host's configuration once parsing is complete.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option holding the plugin names users explicitly turned on.
pub const ENABLE_EXTENSIONS: &str = "enable_extensions";
/// Option holding the codes the user asked to ignore.
pub const IGNORE: &str = "ignore";

#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error("Option '{name}' is already registered")]
    Duplicate { name: String },

    #[error("Invalid value for option '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub parse_from_config: bool,
    #[serde(default)]
    pub comma_separated_list: bool,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            default: None,
            parse_from_config: false,
            comma_separated_list: false,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn parse_from_config(mut self) -> Self {
        self.parse_from_config = true;
        self
    }

    pub fn comma_separated_list(mut self) -> Self {
        self.comma_separated_list = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OptionManager {
    prog: String,
    version: String,
    options: Vec<OptionSpec>,
    extended_default_ignore: Vec<String>,
}

impl OptionManager {
    pub fn new(prog: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            version: version.into(),
            options: Vec::new(),
            extended_default_ignore: Vec::new(),
        }
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn add_option(&mut self, spec: OptionSpec) -> Result<(), OptionError> {
        if self.get(&spec.name).is_some() {
            return Err(OptionError::Duplicate { name: spec.name });
        }
        tracing::trace!(option = %spec.name, "Registered option");
        self.options.push(spec);
        Ok(())
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn extend_default_ignore<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.extended_default_ignore.contains(&name) {
                self.extended_default_ignore.push(name);
            }
        }
    }

    pub fn remove_from_default_ignore<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.extended_default_ignore.retain(|n| n != name);
        }
    }

    pub fn extended_default_ignore(&self) -> &[String] {
        &self.extended_default_ignore
    }

    /// Build parsed options from defaults overlaid with configuration values.
    ///
    /// Only options marked `parse_from_config` read from `values`; unknown
    /// keys are ignored. Comma separated lists accept either a JSON array or
    /// a single string.
    pub fn parse_config(
        &self,
        values: &serde_json::Map<String, Value>,
    ) -> Result<ParsedOptions, OptionError> {
        let mut parsed = ParsedOptions::new();

        for spec in &self.options {
            let raw = if spec.parse_from_config {
                values.get(&spec.name).or(spec.default.as_ref())
            } else {
                spec.default.as_ref()
            };
            let Some(raw) = raw else {
                continue;
            };

            let value = if spec.comma_separated_list {
                Value::Array(
                    split_list(&spec.name, raw)?
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                )
            } else {
                raw.clone()
            };
            parsed.set(spec.name.clone(), value);
        }

        Ok(parsed)
    }
}

fn split_list(name: &str, value: &Value) -> Result<Vec<String>, OptionError> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                other => Err(OptionError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("expected string list item, got {other}"),
                }),
            })
            .collect(),
        other => Err(OptionError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected comma separated list, got {other}"),
        }),
    }
}

/// Configuration values after parsing, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: BTreeMap<String, Value>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Returns string items of a list option, or an empty list when unset.
    pub fn get_list(&self, name: &str) -> Vec<&str> {
        self.values
            .get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Drop `item` from a list option, if present.
    pub fn remove_from_list(&mut self, name: &str, item: &str) {
        if let Some(Value::Array(items)) = self.values.get_mut(name) {
            items.retain(|v| v.as_str() != Some(item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> OptionManager {
        let mut optmanager = OptionManager::new("lint", "1.0.0");
        optmanager
            .add_option(
                OptionSpec::new("max_line_length")
                    .default_value(79)
                    .parse_from_config(),
            )
            .unwrap();
        optmanager
            .add_option(
                OptionSpec::new(ENABLE_EXTENSIONS)
                    .default_value("")
                    .parse_from_config()
                    .comma_separated_list(),
            )
            .unwrap();
        optmanager
            .add_option(OptionSpec::new("verbose").default_value(false))
            .unwrap();
        optmanager
    }

    #[test]
    fn test_add_option_rejects_duplicates() {
        let mut optmanager = manager();
        let err = optmanager
            .add_option(OptionSpec::new("max_line_length"))
            .unwrap_err();
        assert!(matches!(err, OptionError::Duplicate { ref name } if name == "max_line_length"));
        assert_eq!(optmanager.options().len(), 3);
    }

    #[test]
    fn test_parse_config_defaults() {
        let parsed = manager().parse_config(&serde_json::Map::new()).unwrap();
        assert_eq!(parsed.get("max_line_length"), Some(&json!(79)));
        assert!(parsed.get_list(ENABLE_EXTENSIONS).is_empty());
        assert_eq!(parsed.get("verbose"), Some(&json!(false)));
    }

    #[test]
    fn test_parse_config_overrides() {
        let values = json!({
            "max_line_length": 120,
            "enable_extensions": "N8, T4 ,",
            "verbose": true,
            "unknown": 1
        });
        let parsed = manager()
            .parse_config(values.as_object().unwrap())
            .unwrap();

        assert_eq!(parsed.get("max_line_length"), Some(&json!(120)));
        assert_eq!(parsed.get_list(ENABLE_EXTENSIONS), vec!["N8", "T4"]);
        // not parse_from_config
        assert_eq!(parsed.get("verbose"), Some(&json!(false)));
        assert!(!parsed.contains("unknown"));
    }

    #[test]
    fn test_parse_config_rejects_bad_list() {
        let values = json!({ "enable_extensions": 5 });
        let err = manager()
            .parse_config(values.as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, OptionError::InvalidValue { .. }));
    }

    #[test]
    fn test_default_ignore_bookkeeping() {
        let mut optmanager = manager();
        optmanager.extend_default_ignore(["N8", "T4", "N8"]);
        assert_eq!(optmanager.extended_default_ignore(), ["N8", "T4"]);

        optmanager.remove_from_default_ignore(["N8"]);
        assert_eq!(optmanager.extended_default_ignore(), ["T4"]);
    }

    #[test]
    fn test_remove_from_list() {
        let mut options = ParsedOptions::new();
        options.set(IGNORE, json!(["E501", "N8"]));
        options.remove_from_list(IGNORE, "N8");
        assert_eq!(options.get_list(IGNORE), vec!["E501"]);

        options.remove_from_list("missing", "N8");
        assert!(!options.contains("missing"));
    }
}
