//! Config text formats
//!
//! TOML, YAML, JSON and Java-style `.properties` are all parsed into the same
//! [`ConfigObject`] tree. String values may carry `${}` substitutions.

use crate::error::Result;
use crate::value::ConfigObject;
use std::path::Path;

pub mod properties;
mod structured;

pub use properties::{object_from_properties, parse_properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
    Properties,
}

impl Format {
    /// Extensions tried, in priority order, for a resource named without one.
    pub const PROBE_ORDER: [(&'static str, Format); 5] = [
        ("toml", Format::Toml),
        ("yaml", Format::Yaml),
        ("yml", Format::Yaml),
        ("json", Format::Json),
        ("properties", Format::Properties),
    ];

    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "properties" => Some(Format::Properties),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension().and_then(|e| e.to_str()).and_then(Format::from_extension)
    }

    /// Parse `text`; `origin` names the source in error messages.
    pub fn parse(self, text: &str, origin: &str) -> Result<ConfigObject> {
        match self {
            Format::Toml => structured::parse_toml(text, origin),
            Format::Yaml => structured::parse_yaml(text, origin),
            Format::Json => structured::parse_json(text, origin),
            Format::Properties => parse_properties(text, origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("app.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("conf/app.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("app.json")), Some(Format::Json));
        assert_eq!(
            Format::from_path(Path::new("application.properties")),
            Some(Format::Properties)
        );
        assert_eq!(Format::from_path(Path::new("app.conf")), None);
        assert_eq!(Format::from_path(Path::new("app")), None);
    }
}
