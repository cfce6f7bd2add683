//! Convenience accessors and the process-wide config slot

use crate::builder::ConfigBuilder;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::value::ConfigValue;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

static PROPERTIES: ConfigCell = ConfigCell::new();

pub fn builder() -> ConfigBuilder {
    ConfigBuilder::new()
}

/// `extractor(config, path)` when `path` is present, `default` otherwise.
///
/// ```
/// use config_chain::{configs, Config, Format};
///
/// let config = Config::parse_str("port = 9000", Format::Toml).unwrap();
/// let port = configs::get_or_default(&config, "port", Config::get_i64, 8080).unwrap();
/// let threads = configs::get_or_default(&config, "threads", Config::get_i64, 4).unwrap();
/// assert_eq!((port, threads), (9000, 4));
/// ```
pub fn get_or_default<T, F>(config: &Config, path: &str, extractor: F, default: T) -> Result<T>
where
    F: FnOnce(&Config, &str) -> Result<T>,
{
    get_or_else(config, path, extractor, || default)
}

/// Like [`get_or_default`], but `default` only runs when `path` is absent.
pub fn get_or_else<T, F, D>(config: &Config, path: &str, extractor: F, default: D) -> Result<T>
where
    F: FnOnce(&Config, &str) -> Result<T>,
    D: FnOnce() -> T,
{
    if config.has_path(path) {
        extractor(config, path)
    } else {
        Ok(default())
    }
}

/// Flatten into fully qualified dotted paths.
pub fn as_map(config: &Config) -> BTreeMap<String, ConfigValue> {
    config
        .entries()
        .into_iter()
        .map(|(path, value)| (path, value.clone()))
        .collect()
}

/// A slot that accepts exactly one config.
#[derive(Debug, Default)]
pub struct ConfigCell {
    slot: OnceCell<Config>,
}

impl ConfigCell {
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Store `config`. Every call after the first successful one fails,
    /// including concurrent ones.
    pub fn init(&self, config: Config) -> Result<&Config> {
        self.slot
            .try_insert(config)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    pub fn get(&self) -> Option<&Config> {
        self.slot.get()
    }
}

/// Initialize the process-wide config. Fails if it is already set.
pub fn init_properties(config: Config) -> Result<&'static Config> {
    let stored = PROPERTIES.init(config)?;
    tracing::debug!(entries = stored.entries().len(), "Initialized process-wide config");
    Ok(stored)
}

/// The process-wide config, if [`init_properties`] has run.
pub fn properties() -> Option<&'static Config> {
    PROPERTIES.get()
}
