//! Process properties
//!
//! The process-level equivalent of `-Dkey=value` flags: a key/value store
//! seeded with a few system defaults (`user.home`, `os.name`, ...) that a
//! program can extend at startup. Builders read a cached snapshot, taken on
//! first access; later changes only show up after [`PropertyStore::reload`].

use crate::format::object_from_properties;
use crate::value::ConfigObject;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

static GLOBAL: Lazy<PropertyStore> = Lazy::new(PropertyStore::with_system_defaults);

#[derive(Debug, Default)]
pub struct PropertyStore {
    values: RwLock<BTreeMap<String, String>>,
    snapshot: RwLock<Option<Arc<ConfigObject>>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the system defaults.
    pub fn with_system_defaults() -> Self {
        let store = Self::new();
        store.extend(system_defaults());
        store
    }

    /// The process-wide store used by `ConfigBuilder::with_process_properties`.
    pub fn global() -> &'static PropertyStore {
        &GLOBAL
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// Current value, independent of the cached snapshot.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    pub fn extend<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = self.values.write();
        for (key, value) in pairs {
            values.insert(key.into(), value.into());
        }
    }

    /// Cached layer, built on first access.
    pub fn snapshot(&self) -> Arc<ConfigObject> {
        if let Some(cached) = self.snapshot.read().as_ref() {
            return Arc::clone(cached);
        }
        let mut slot = self.snapshot.write();
        if let Some(cached) = slot.as_ref() {
            return Arc::clone(cached);
        }
        let built = Arc::new(self.build_layer());
        *slot = Some(Arc::clone(&built));
        built
    }

    /// Rebuild the cached snapshot from the current values.
    pub fn reload(&self) -> Arc<ConfigObject> {
        let built = Arc::new(self.build_layer());
        *self.snapshot.write() = Some(Arc::clone(&built));
        tracing::debug!(entries = built.len(), "Reloaded process properties");
        built
    }

    fn build_layer(&self) -> ConfigObject {
        let values = self.values.read();
        object_from_properties(values.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }
}

pub fn set_process_property(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    PropertyStore::global().set(key, value)
}

pub fn remove_process_property(key: &str) -> Option<String> {
    PropertyStore::global().remove(key)
}

pub fn process_property(key: &str) -> Option<String> {
    PropertyStore::global().get(key)
}

/// Rebuild the global snapshot so new builders see current values.
pub fn reload_process_properties() {
    PropertyStore::global().reload();
}

fn system_defaults() -> Vec<(&'static str, String)> {
    let mut defaults = vec![
        ("os.name", std::env::consts::OS.to_string()),
        ("os.arch", std::env::consts::ARCH.to_string()),
        ("file.separator", std::path::MAIN_SEPARATOR.to_string()),
        ("path.separator", if cfg!(windows) { ";" } else { ":" }.to_string()),
        ("line.separator", if cfg!(windows) { "\r\n" } else { "\n" }.to_string()),
    ];
    if let Some(home) = dirs::home_dir() {
        defaults.push(("user.home", home.display().to_string()));
    }
    if let Ok(dir) = std::env::current_dir() {
        defaults.push(("user.dir", dir.display().to_string()));
    }
    if let Ok(name) = std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
        defaults.push(("user.name", name));
    }
    defaults
}
