//! Configuration value tree
//!
//! A [`ConfigObject`] is an ordered map of keys to [`ConfigValue`]s. Layers are
//! combined with [`ConfigObject::with_fallback`]: the receiver wins on
//! conflicts, nested objects merge key by key.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::btree_map::{self, BTreeMap};

pub mod path;
pub mod template;

pub use path::{join_path, parse_path, render_path};
pub use template::{Reference, Template, TemplatePart};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Object(ConfigObject),
    /// String with `${}` references, only present before resolution.
    Template(Template),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Object(_) => "object",
            ConfigValue::Template(_) => "unresolved substitution",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigObject> {
        match self {
            ConfigValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text form of a scalar, as used in string concatenation and string getters.
    pub fn render_scalar(&self) -> Option<String> {
        match self {
            ConfigValue::Null => Some("null".to_string()),
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::List(_) | ConfigValue::Object(_) | ConfigValue::Template(_) => None,
        }
    }

    /// Merge `fallback` beneath this value. Only objects merge; otherwise `self` wins.
    pub fn with_fallback(self, fallback: ConfigValue) -> ConfigValue {
        match (self, fallback) {
            (ConfigValue::Object(primary), ConfigValue::Object(fallback)) => {
                ConfigValue::Object(primary.with_fallback(fallback))
            }
            (primary, _) => primary,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            ConfigValue::Template(_) => false,
            ConfigValue::List(items) => items.iter().all(ConfigValue::is_resolved),
            ConfigValue::Object(obj) => obj.is_resolved(),
            _ => true,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Integer(value.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::List(value)
    }
}

impl From<ConfigObject> for ConfigValue {
    fn from(value: ConfigObject) -> Self {
        ConfigValue::Object(value)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Template(t) => serializer.serialize_str(&t.to_string()),
            ConfigValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigObject {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    /// Walk `path` through nested objects.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&ConfigValue> {
        let (first, rest) = path.split_first()?;
        let value = self.entries.get(first.as_ref())?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.as_object()?.lookup(rest)
        }
    }

    /// Insert `value` at a nested path, creating intermediate objects.
    ///
    /// When a key is both a leaf and a parent (`a=1` and `a.b=2`) the object
    /// wins, whatever the insertion order.
    pub fn insert_path(&mut self, path: &[String], value: ConfigValue) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };

        if rest.is_empty() {
            let keeps_object = matches!(self.entries.get(first), Some(ConfigValue::Object(_)))
                && !matches!(value, ConfigValue::Object(_));
            if !keeps_object {
                self.entries.insert(first.clone(), value);
            }
            return;
        }

        let slot = self
            .entries
            .entry(first.clone())
            .or_insert_with(|| ConfigValue::Object(ConfigObject::new()));
        if !matches!(slot, ConfigValue::Object(_)) {
            *slot = ConfigValue::Object(ConfigObject::new());
        }
        if let ConfigValue::Object(child) = slot {
            child.insert_path(rest, value);
        }
    }

    /// Merge `fallback` beneath this object: keys already present win,
    /// nested objects are merged recursively.
    pub fn with_fallback(mut self, fallback: ConfigObject) -> ConfigObject {
        for (key, fallback_value) in fallback.entries {
            let merged = match self.entries.remove(&key) {
                Some(primary) => primary.with_fallback(fallback_value),
                None => fallback_value,
            };
            self.entries.insert(key, merged);
        }
        self
    }

    /// Flatten into `(path, value)` pairs for every non-object, non-null leaf.
    pub fn leaf_entries(&self) -> Vec<(String, &ConfigValue)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a ConfigValue)>) {
        for (key, value) in &self.entries {
            let path = join_path(prefix, key);
            match value {
                ConfigValue::Object(child) => child.collect_leaves(&path, out),
                ConfigValue::Null => {}
                other => out.push((path, other)),
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.entries.values().all(ConfigValue::is_resolved)
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigObject {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl IntoIterator for ConfigObject {
    type Item = (String, ConfigValue);
    type IntoIter = btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigObject {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ConfigObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
