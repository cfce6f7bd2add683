//! Bundled resources
//!
//! A resource is config text shipped with the program and addressed by a
//! logical name (`application.properties`) rather than a filesystem path.

use crate::error::{ConfigError, Result};
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

pub trait ResourceLoader: Send + Sync {
    /// Raw bytes of `name`, or `None` when no such resource exists.
    fn load(&self, name: &str) -> Result<Option<Cow<'static, [u8]>>>;
}

/// Loader with no resources at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceLoader for NoResources {
    fn load(&self, _name: &str) -> Result<Option<Cow<'static, [u8]>>> {
        Ok(None)
    }
}

/// Resources compiled into the binary with `#[derive(RustEmbed)]`.
///
/// ```ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "resources/"]
/// struct Bundled;
///
/// let builder = ConfigBuilder::new().with_resource_loader(EmbeddedResources::<Bundled>::new());
/// ```
pub struct EmbeddedResources<E> {
    _embed: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedResources<E> {
    pub fn new() -> Self {
        Self { _embed: PhantomData }
    }
}

impl<E: RustEmbed> Default for EmbeddedResources<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EmbeddedResources<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedResources").finish()
    }
}

impl<E: RustEmbed> ResourceLoader for EmbeddedResources<E> {
    fn load(&self, name: &str) -> Result<Option<Cow<'static, [u8]>>> {
        Ok(E::get(name).map(|file| file.data))
    }
}

/// In-memory resources, mostly for tests and programs that assemble
/// resources with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: BTreeMap<String, Cow<'static, [u8]>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), Cow::Owned(content.into().into_bytes()));
        self
    }

    pub fn with_static(mut self, name: impl Into<String>, content: &'static str) -> Self {
        self.entries.insert(name.into(), Cow::Borrowed(content.as_bytes()));
        self
    }
}

impl ResourceLoader for MemoryResources {
    fn load(&self, name: &str) -> Result<Option<Cow<'static, [u8]>>> {
        Ok(self.entries.get(name).cloned())
    }
}

/// Resources read at runtime from a directory, like a classpath folder.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceLoader for DirResources {
    fn load(&self, name: &str) -> Result<Option<Cow<'static, [u8]>>> {
        let path = self.root.join(name.trim_start_matches('/'));
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(Cow::Owned(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }
}
