//! Config files on disk

use crate::error::{ConfigError, Result};
use crate::format::Format;
use crate::value::ConfigObject;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Read and parse a config file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<ConfigObject> {
    let origin = path.display().to_string();
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        origin: origin.clone(),
    })?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content, &origin)
}

/// Join `relative` onto `home`, ignoring any leading separators on `relative`.
pub fn home_dir_path(home: &Path, relative: &Path) -> PathBuf {
    let trimmed: PathBuf = relative
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    home.join(trimmed)
}

/// Absolute working directory, the base for relative config paths.
pub fn working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
