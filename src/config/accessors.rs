//! Typed accessors
//!
//! Values from environment variables and `.properties` files are strings, so
//! numeric and boolean getters parse strings, and the string getter renders
//! numbers and booleans. Nothing else is coerced.

use super::Config;
use crate::error::{ConfigError, Result};
use crate::value::ConfigValue;

impl Config {
    pub fn get_string(&self, path: &str) -> Result<String> {
        let value = self.get_value(path)?;
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            ConfigValue::Bool(_) | ConfigValue::Integer(_) | ConfigValue::Float(_) => {
                Ok(value.render_scalar().unwrap_or_default())
            }
            other => Err(wrong_type(path, "string", other)),
        }
    }

    pub fn get_i64(&self, path: &str) -> Result<i64> {
        match self.get_value(path)? {
            ConfigValue::Integer(i) => Ok(*i),
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            ConfigValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            ConfigValue::String(s) => s.trim().parse().map_err(|_| ConfigError::WrongType {
                path: path.to_string(),
                expected: "integer",
                found: "string",
            }),
            other => Err(wrong_type(path, "integer", other)),
        }
    }

    pub fn get_f64(&self, path: &str) -> Result<f64> {
        match self.get_value(path)? {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            ConfigValue::String(s) => s.trim().parse().map_err(|_| ConfigError::WrongType {
                path: path.to_string(),
                expected: "float",
                found: "string",
            }),
            other => Err(wrong_type(path, "float", other)),
        }
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        match self.get_value(path)? {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::String(s) => parse_bool(s).ok_or_else(|| ConfigError::WrongType {
                path: path.to_string(),
                expected: "boolean",
                found: "string",
            }),
            other => Err(wrong_type(path, "boolean", other)),
        }
    }

    /// The object at `path` as a config of its own.
    pub fn get_config(&self, path: &str) -> Result<Config> {
        match self.get_value(path)? {
            ConfigValue::Object(obj) => Ok(Config { root: obj.clone() }),
            other => Err(wrong_type(path, "object", other)),
        }
    }

    pub fn get_list(&self, path: &str) -> Result<&[ConfigValue]> {
        match self.get_value(path)? {
            ConfigValue::List(items) => Ok(items),
            other => Err(wrong_type(path, "list", other)),
        }
    }

    pub fn get_string_list(&self, path: &str) -> Result<Vec<String>> {
        self.get_list(path)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ConfigValue::List(_) | ConfigValue::Object(_) | ConfigValue::Null => {
                    Err(wrong_type(&format!("{path}[{index}]"), "string", item))
                }
                scalar => Ok(scalar.render_scalar().unwrap_or_default()),
            })
            .collect()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn wrong_type(path: &str, expected: &'static str, found: &ConfigValue) -> ConfigError {
    ConfigError::WrongType {
        path: path.to_string(),
        expected,
        found: found.type_name(),
    }
}
