//! Fallback-chain builder
//!
//! Sources are merged in call order and the *first* one registered has the
//! highest priority: every later source only fills paths that nothing before
//! it defined. Substitutions are resolved once, in [`ConfigBuilder::build`].
//!
//! ```no_run
//! use config_chain::ConfigBuilder;
//!
//! # fn main() -> config_chain::Result<()> {
//! let config = ConfigBuilder::new()
//!     .with_environment()
//!     .with_process_properties()
//!     .with_optional_file("application.dev.properties")?
//!     .with_optional_file("application.properties")?
//!     .build()?;
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::format::Format;
use crate::resolve::ResolveOptions;
use crate::sources::{
    environment_layer, home_dir_path, load_file, working_directory, NoResources, PropertyStore,
    ResourceLoader,
};
use crate::value::ConfigObject;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ConfigBuilder {
    root: ConfigObject,
    resources: Arc<dyn ResourceLoader>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder").field("root", &self.root).finish_non_exhaustive()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        info!("Loading configs: the first source has the highest priority, each later source is a fallback");
        Self {
            root: ConfigObject::new(),
            resources: Arc::new(NoResources),
        }
    }

    fn push_layer(mut self, layer: ConfigObject) -> Self {
        self.root = self.root.with_fallback(layer);
        self
    }

    /// All environment variables, as flat top-level keys.
    pub fn with_environment(self) -> Self {
        let layer = environment_layer();
        info!(entries = layer.len(), "Loaded system environment into config");
        self.push_layer(layer)
    }

    /// The process-wide property store. Cached on first use; see
    /// [`reload_process_properties`](crate::sources::reload_process_properties).
    pub fn with_process_properties(self) -> Self {
        self.with_property_store(PropertyStore::global())
    }

    pub fn with_property_store(self, store: &PropertyStore) -> Self {
        let snapshot = store.snapshot();
        info!(entries = snapshot.len(), "Loaded process properties into config");
        self.push_layer(ConfigObject::clone(&snapshot))
    }

    /// Parse `path` if it exists. A missing file is skipped; a malformed one is an error.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                path = %path.display(),
                working_dir = %working_directory().display(),
                "Attempted to load config file but it was not found, relative paths are searched from the working directory"
            );
            return Ok(self);
        }

        let layer = load_file(path)?;
        info!(path = %path.display(), entries = layer.len(), "Loaded config file");
        Ok(self.push_layer(layer))
    }

    /// [`with_optional_file`](Self::with_optional_file) relative to the user's home directory.
    pub fn with_optional_home_dir_file(self, relative: impl AsRef<Path>) -> Result<Self> {
        let relative = relative.as_ref();
        match dirs::home_dir() {
            Some(home) => self.with_optional_file(home_dir_path(&home, relative)),
            None => {
                info!(path = %relative.display(), "No home directory for this user, skipping config file");
                Ok(self)
            }
        }
    }

    /// Loader consulted by subsequent [`with_resource`](Self::with_resource) calls.
    pub fn with_resource_loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.resources = Arc::new(loader);
        self
    }

    /// Merge a bundled resource.
    ///
    /// A name without an extension probes `.toml`, `.yaml`, `.yml`, `.json`
    /// and `.properties`, merging every hit in that order.
    pub fn with_resource(self, name: &str) -> Result<Self> {
        let candidates: Vec<(String, Format)> = match Format::from_path(Path::new(name)) {
            Some(format) => vec![(name.to_string(), format)],
            None if Path::new(name).extension().is_none() => Format::PROBE_ORDER
                .iter()
                .map(|(ext, format)| (format!("{name}.{ext}"), *format))
                .collect(),
            None => {
                return Err(ConfigError::UnsupportedFormat {
                    origin: format!("resource {name}"),
                })
            }
        };

        let mut found = false;
        let mut layer = ConfigObject::new();
        for (candidate, format) in candidates {
            let Some(bytes) = self.resources.load(&candidate)? else {
                continue;
            };
            found = true;
            let origin = format!("resource {candidate}");
            let text = std::str::from_utf8(&bytes).map_err(|e| ConfigError::parse(&origin, e))?;
            layer = layer.with_fallback(format.parse(text, &origin)?);
        }

        if !found {
            info!(resource = name, "Config resource was not found, skipping");
            return Ok(self);
        }
        if layer.is_empty() {
            info!(resource = name, "Loaded config file from resource, it contains no values");
        } else {
            info!(resource = name, entries = layer.len(), "Loaded config file from resource");
        }
        Ok(self.push_layer(layer))
    }

    /// Merge an existing config beneath everything registered so far.
    pub fn with_config(self, config: Config) -> Self {
        self.push_layer(config.root().clone())
    }

    /// Resolve substitutions and produce the final config.
    pub fn build(&self) -> Result<Config> {
        self.build_with(&ResolveOptions::default())
    }

    pub fn build_with(&self, options: &ResolveOptions) -> Result<Config> {
        let config = Config::from_object_with(self.root.clone(), options)?;
        debug!("Logging resolved config. Make sure sensitive data such as passwords or secrets are not logged!");
        debug!("{}", config.render());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemoryResources;
    use parking_lot::Mutex;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a thread-local subscriber and return what it logged.
    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().clone();
        String::from_utf8(bytes).expect("utf-8 logs")
    }

    fn config(text: &str) -> Config {
        Config::parse_str(text, Format::Toml).expect("config")
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = ConfigBuilder::new().with_config(config("a = 1\nb = '${a}'\n"));
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.get_i64("b").unwrap(), 1);
    }

    #[test]
    fn test_substitution_across_layers() {
        let resources = MemoryResources::new()
            .with("defaults.toml", "host = 'localhost'\nurl = 'http://${host}:${port}'\nport = 80\n");
        let built = ConfigBuilder::new()
            .with_resource_loader(resources)
            .with_config(config("host = 'example.org'\n"))
            .with_resource("defaults.toml")
            .unwrap()
            .build()
            .unwrap();
        // Resolution runs after merging, so the higher-priority host is used
        assert_eq!(built.get_string("url").unwrap(), "http://example.org:80");
    }

    #[test]
    fn test_unresolved_reference_fails_build() {
        let resources = MemoryResources::new().with("app.properties", "url=http://${missing.host}\n");
        let builder = ConfigBuilder::new()
            .with_resource_loader(resources)
            .with_resource("app.properties")
            .unwrap();
        match builder.build().unwrap_err() {
            ConfigError::UnresolvedSubstitution { path, reference } => {
                assert_eq!(path, "url");
                assert_eq!(reference, "missing.host");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_file_fails_immediately() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "[unclosed\n").expect("write");
        let result = ConfigBuilder::new().with_optional_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_resource_without_extension_probes_formats() {
        let resources = MemoryResources::new()
            .with("app.toml", "source = 'toml'\nonly_toml = 1\n")
            .with("app.properties", "source=properties\nonly_properties=2\n");
        let built = ConfigBuilder::new()
            .with_resource_loader(resources)
            .with_resource("app")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(built.get_string("source").unwrap(), "toml");
        assert_eq!(built.get_i64("only_toml").unwrap(), 1);
        assert_eq!(built.get_i64("only_properties").unwrap(), 2);
    }

    #[test]
    fn test_missing_and_empty_resources_are_not_errors() {
        let resources = MemoryResources::new().with("empty.properties", "# nothing here\n");
        let built = ConfigBuilder::new()
            .with_resource_loader(resources)
            .with_resource("missing.properties")
            .unwrap()
            .with_resource("empty.properties")
            .unwrap()
            .build()
            .unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn test_missing_and_empty_resources_log_differently() {
        let resources = MemoryResources::new().with("empty.properties", "# nothing here\n");
        let builder = ConfigBuilder::new().with_resource_loader(resources);

        let missing = capture_logs(|| {
            builder.clone().with_resource("missing.properties").unwrap();
        });
        let empty = capture_logs(|| {
            builder.clone().with_resource("empty.properties").unwrap();
        });

        assert!(missing.contains("missing.properties"));
        assert!(missing.contains("not found"));
        assert!(!missing.contains("contains no values"));
        assert!(empty.contains("empty.properties"));
        assert!(empty.contains("contains no values"));
        assert!(!empty.contains("not found"));
    }

    #[test]
    fn test_missing_file_log_names_working_directory() {
        let logs = capture_logs(|| {
            ConfigBuilder::new()
                .with_optional_file("definitely-missing.properties")
                .unwrap();
        });
        let line = logs
            .lines()
            .find(|line| line.contains("definitely-missing.properties"))
            .expect("missing file is logged");
        assert!(line.contains("not found"));
        assert!(line.contains(&working_directory().display().to_string()));
    }

    #[test]
    fn test_resource_with_unknown_extension_is_error() {
        let result = ConfigBuilder::new().with_resource("app.conf");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_property_store_layer() {
        let store = PropertyStore::new();
        store.set("db.host", "from-properties");
        let built = ConfigBuilder::new()
            .with_property_store(&store)
            .with_config(config("[db]\nhost = 'fallback'\nport = 1\n"))
            .build()
            .unwrap();
        assert_eq!(built.get_string("db.host").unwrap(), "from-properties");
        assert_eq!(built.get_i64("db.port").unwrap(), 1);
    }
}
