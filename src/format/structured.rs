//! TOML, YAML and JSON parsing

use crate::error::{ConfigError, Result};
use crate::value::{ConfigObject, ConfigValue, Template};

pub fn parse_toml(text: &str, origin: &str) -> Result<ConfigObject> {
    let raw: toml::Table = toml::from_str(text).map_err(|e| ConfigError::parse(origin, e))?;
    raw.into_iter()
        .map(|(key, value)| Ok::<_, ConfigError>((key, from_toml(value, origin)?)))
        .collect()
}

fn from_toml(value: toml::Value, origin: &str) -> Result<ConfigValue> {
    Ok(match value {
        toml::Value::String(s) => string_value(s, origin)?,
        toml::Value::Integer(i) => ConfigValue::Integer(i),
        toml::Value::Float(f) => ConfigValue::Float(f),
        toml::Value::Boolean(b) => ConfigValue::Bool(b),
        toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
        toml::Value::Array(items) => ConfigValue::List(
            items.into_iter().map(|v| from_toml(v, origin)).collect::<Result<_>>()?,
        ),
        toml::Value::Table(table) => ConfigValue::Object(
            table
                .into_iter()
                .map(|(key, value)| Ok::<_, ConfigError>((key, from_toml(value, origin)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

pub fn parse_yaml(text: &str, origin: &str) -> Result<ConfigObject> {
    let raw: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ConfigError::parse(origin, e))?;
    match from_yaml(raw, origin)? {
        // An empty document is an empty config
        ConfigValue::Null => Ok(ConfigObject::new()),
        ConfigValue::Object(obj) => Ok(obj),
        other => Err(ConfigError::parse(
            origin,
            format!("top-level value must be a mapping, found {}", other.type_name()),
        )),
    }
}

fn from_yaml(value: serde_yaml::Value, origin: &str) -> Result<ConfigValue> {
    Ok(match value {
        serde_yaml::Value::Null => ConfigValue::Null,
        serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                ConfigValue::Float(f)
            } else {
                ConfigValue::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => string_value(s, origin)?,
        serde_yaml::Value::Sequence(items) => ConfigValue::List(
            items.into_iter().map(|v| from_yaml(v, origin)).collect::<Result<_>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut obj = ConfigObject::new();
            for (key, value) in mapping {
                let key = yaml_key(key, origin)?;
                obj.insert(key, from_yaml(value, origin)?);
            }
            ConfigValue::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value, origin)?,
    })
}

fn yaml_key(key: serde_yaml::Value, origin: &str) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        _ => Err(ConfigError::parse(origin, "mapping keys must be scalars")),
    }
}

pub fn parse_json(text: &str, origin: &str) -> Result<ConfigObject> {
    let raw: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConfigError::parse(origin, e))?;
    match from_json(raw, origin)? {
        ConfigValue::Object(obj) => Ok(obj),
        other => Err(ConfigError::parse(
            origin,
            format!("top-level value must be an object, found {}", other.type_name()),
        )),
    }
}

fn from_json(value: serde_json::Value, origin: &str) -> Result<ConfigValue> {
    Ok(match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigValue::Integer(i)
            } else if n.is_f64() {
                ConfigValue::Float(n.as_f64().unwrap_or_default())
            } else {
                // Integers beyond i64 keep their exact digits
                ConfigValue::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => string_value(s, origin)?,
        serde_json::Value::Array(items) => ConfigValue::List(
            items.into_iter().map(|v| from_json(v, origin)).collect::<Result<_>>()?,
        ),
        serde_json::Value::Object(map) => ConfigValue::Object(
            map.into_iter()
                .map(|(key, value)| Ok::<_, ConfigError>((key, from_json(value, origin)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

/// File strings become templates when they reference other paths.
pub(crate) fn string_value(s: String, origin: &str) -> Result<ConfigValue> {
    Ok(match Template::parse(&s, origin)? {
        Some(template) => ConfigValue::Template(template),
        None => ConfigValue::String(s),
    })
}
