//! Resolved configuration
//!
//! A [`Config`] is the immutable output of a build: merged, with every
//! substitution expanded. Values are addressed by dotted path.

use crate::error::{ConfigError, Result};
use crate::format::Format;
use crate::resolve::{resolve, ResolveOptions};
use crate::value::{parse_path, ConfigObject, ConfigValue};
use figment::providers::Serialized;
use figment::Figment;
use serde::de::DeserializeOwned;

mod accessors;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: ConfigObject,
}

impl Config {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve a raw tree into a config.
    pub fn from_object(raw: ConfigObject) -> Result<Self> {
        Self::from_object_with(raw, &ResolveOptions::default())
    }

    pub fn from_object_with(raw: ConfigObject, options: &ResolveOptions) -> Result<Self> {
        Ok(Self {
            root: resolve(&raw, options)?,
        })
    }

    /// Parse and resolve config text.
    pub fn parse_str(text: &str, format: Format) -> Result<Self> {
        Self::from_object(format.parse(text, "string")?)
    }

    pub fn root(&self) -> &ConfigObject {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// True when `path` holds a non-null value. Invalid path expressions are absent.
    pub fn has_path(&self, path: &str) -> bool {
        parse_path(path)
            .ok()
            .and_then(|segments| self.root.lookup(&segments))
            .is_some_and(|value| !value.is_null())
    }

    pub fn get_value(&self, path: &str) -> Result<&ConfigValue> {
        let segments = parse_path(path)?;
        match self.root.lookup(&segments) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(ConfigError::Missing {
                path: path.to_string(),
            }),
        }
    }

    /// Flattened `(path, value)` pairs for every leaf.
    pub fn entries(&self) -> Vec<(String, &ConfigValue)> {
        self.root.leaf_entries()
    }

    /// Combine with `fallback` beneath this config.
    pub fn with_fallback(&self, fallback: &Config) -> Config {
        Config {
            root: self.root.clone().with_fallback(fallback.root.clone()),
        }
    }

    /// Pretty JSON rendering of the whole tree.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_default()
    }

    /// Deserialize the whole config into `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Figment::from(Serialized::defaults(&self.root))
            .extract()
            .map_err(|e| ConfigError::from(Box::new(e)))
    }

    /// Deserialize the value at `path` into `T`.
    pub fn extract_at<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get_value(path)?;
        Figment::from(Serialized::default("value", value))
            .extract_inner("value")
            .map_err(|e| ConfigError::from(Box::new(e)))
    }
}
