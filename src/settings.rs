//! Pipeline configuration
//!
//! [`Settings`] is an immutable bag of named values. It is assembled once by a
//! [`SettingsBuilder`] from defaults, an optional settings file, prefixed
//! environment variables and explicit overrides, and afterwards only read.
//! Keys are case-insensitive and stored upper-cased.

use crate::error::EtlError;
use crate::storage::TextEncoding;

use eyre::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix for environment variables picked up by [`SettingsBuilder::env`]
pub const ENV_PREFIX: &str = "ETL_";

pub const EXTRACTOR_NAME: &str = "EXTRACTOR_NAME";
pub const TRANSFORMER_NAME: &str = "TRANSFORMER_NAME";
pub const LOADER_NAME: &str = "LOADER_NAME";
pub const EXTRACTOR_NAMESPACE: &str = "EXTRACTOR_NAMESPACE";
pub const TRANSFORMER_NAMESPACE: &str = "TRANSFORMER_NAMESPACE";
pub const LOADER_NAMESPACE: &str = "LOADER_NAMESPACE";
pub const ENCODING: &str = "ENCODING";
pub const MAX_RECORDS: &str = "MAX_RECORDS";
pub const LOGLEVEL: &str = "LOGLEVEL";
pub const DEBUG: &str = "DEBUG";
pub const VERBOSE: &str = "VERBOSE";

const DEFAULTS: &[(&str, &str)] = &[
    (EXTRACTOR_NAME, "file"),
    (TRANSFORMER_NAME, "strip"),
    (LOADER_NAME, "file"),
    (EXTRACTOR_NAMESPACE, "etl.extractor"),
    (TRANSFORMER_NAMESPACE, "etl.transformer"),
    (LOADER_NAMESPACE, "etl.loader"),
    (ENCODING, "utf-8"),
    (LOGLEVEL, "info"),
    (DEBUG, "false"),
    (VERBOSE, "false"),
];

/// Immutable named configuration values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Build settings directly from key/value pairs, without defaults
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = SettingsBuilder::default();
        for (key, value) in pairs {
            builder = builder.set(key, value);
        }
        builder.build()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a value that must be present and non-empty
    pub fn require(&self, key: &str) -> Result<&str, EtlError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(EtlError::MissingSetting(normalize_key(key))),
        }
    }

    /// Interpret a value as a boolean; absent means `false`
    pub fn get_bool(&self, key: &str) -> Result<bool, EtlError> {
        let Some(value) = self.get(key) else {
            return Ok(false);
        };
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(EtlError::invalid_setting(
                normalize_key(key),
                format!("expected a boolean, got \"{}\"", other),
            )),
        }
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, EtlError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| EtlError::invalid_setting(normalize_key(key), e)),
        }
    }

    /// Split a comma-separated value, dropping empty entries
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn path(&self, key: &str) -> Result<PathBuf, EtlError> {
        self.require(key).map(PathBuf::from)
    }

    /// Text encoding used by file-backed stages
    pub fn encoding(&self) -> Result<TextEncoding, EtlError> {
        TextEncoding::from_label(self.get_or(ENCODING, "utf-8"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Layered construction of [`Settings`]; later layers override earlier ones
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    values: BTreeMap<String, String>,
}

impl SettingsBuilder {
    pub fn with_defaults(mut self) -> Self {
        for (key, value) in DEFAULTS {
            self.values.insert((*key).to_string(), (*value).to_string());
        }
        self
    }

    pub fn set(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.values.insert(normalize_key(key.as_ref()), value.into());
        self
    }

    /// Apply a `KEY=VALUE` override as given on the command line
    pub fn assignment(self, assignment: &str) -> Result<Self> {
        let Some((key, value)) = assignment.split_once('=') else {
            eyre::bail!("Expected KEY=VALUE, got \"{}\"", assignment);
        };
        if key.trim().is_empty() {
            eyre::bail!("Empty setting name in \"{}\"", assignment);
        }
        Ok(self.set(key.trim(), value))
    }

    /// Merge values from a YAML or JSON5 settings file, chosen by extension
    pub fn file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);
        let parsed: BTreeMap<String, Option<SettingValue>> = match extension.as_deref() {
            Some("yml") | Some("yaml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML settings: {}", path.display()))?,
            Some("json") | Some("json5") => json5::from_str(&content)
                .with_context(|| format!("Failed to parse JSON5 settings: {}", path.display()))?,
            _ => eyre::bail!(
                "Unsupported settings file type: {} (expected .yml, .yaml, .json or .json5)",
                path.display()
            ),
        };

        for (key, value) in parsed {
            if let Some(value) = value {
                self.values.insert(normalize_key(&key), value.into_string());
            }
        }
        Ok(self)
    }

    /// Merge process environment variables carrying `prefix`, with the prefix removed
    pub fn env(self, prefix: &str) -> Self {
        self.vars(prefix, std::env::vars())
    }

    fn vars(mut self, prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let prefix = prefix.to_uppercase();
        for (key, value) in vars {
            let upper = key.to_uppercase();
            if let Some(name) = upper.strip_prefix(&prefix) {
                if !name.is_empty() {
                    self.values.insert(name.to_string(), value);
                }
            }
        }
        self
    }

    pub fn build(self) -> Settings {
        Settings {
            values: self.values,
        }
    }
}

/// Scalar or list value as it appears in a settings file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<SettingValue>),
}

impl SettingValue {
    fn into_string(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
            Self::List(items) => items
                .into_iter()
                .map(Self::into_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}
